use glam::Mat4;

use super::instancing::{visible_instances, InstanceRaw};
use crate::asset::Bounds;
use crate::camera::Frustum;
use crate::gpu::render_context::RenderContext;
use crate::gpu::GrowableBuffer;
use crate::mesh::Model;

/// A model placed in the world one or more times.
///
/// Holds the full transform list on the CPU and, after each
/// [`cull`](Self::cull), only the visible instances on the GPU.
pub struct SceneObject {
    /// Display name used in logs.
    pub name: String,
    /// The uploaded model.
    pub model: Model,
    transforms: Vec<Mat4>,
    instances: GrowableBuffer<InstanceRaw>,
    /// Shaders read `instance_index` as the placement index, so every
    /// placement is uploaded in order and nothing is culled.
    indexed: bool,
}

/// Instances to upload for one frame. Indexed objects keep every
/// placement at its own index; others keep only what touches `frustum`.
fn frame_instances(
    transforms: &[Mat4],
    bounds: &Bounds,
    frustum: &Frustum,
    indexed: bool,
) -> Vec<InstanceRaw> {
    if indexed {
        transforms.iter().map(InstanceRaw::from_transform).collect()
    } else {
        visible_instances(transforms, bounds, frustum)
    }
}

impl SceneObject {
    /// Place `model` once at `transform`.
    #[must_use]
    pub fn single(
        context: &RenderContext,
        name: impl Into<String>,
        model: Model,
        transform: Mat4,
    ) -> Self {
        Self::instanced(context, name, model, vec![transform])
    }

    /// Place `model` at every transform in `transforms`.
    #[must_use]
    pub fn instanced(
        context: &RenderContext,
        name: impl Into<String>,
        model: Model,
        transforms: Vec<Mat4>,
    ) -> Self {
        Self::new(context, name.into(), model, transforms, false)
    }

    /// Place `model` at every transform, never culled, so instance `i` is
    /// always placement `i`. Used when the shader indexes per-instance data
    /// (light markers read `lighting.points[instance_index]`).
    #[must_use]
    pub fn indexed(
        context: &RenderContext,
        name: impl Into<String>,
        model: Model,
        transforms: Vec<Mat4>,
    ) -> Self {
        Self::new(context, name.into(), model, transforms, true)
    }

    fn new(
        context: &RenderContext,
        name: String,
        model: Model,
        transforms: Vec<Mat4>,
        indexed: bool,
    ) -> Self {
        let raw: Vec<InstanceRaw> =
            transforms.iter().map(InstanceRaw::from_transform).collect();
        let instances = GrowableBuffer::new_with_data(
            &context.device,
            &context.queue,
            &format!("{name} Instances"),
            &raw,
            wgpu::BufferUsages::VERTEX,
        );
        Self {
            name,
            model,
            transforms,
            instances,
            indexed,
        }
    }

    /// Every placement, visible or not.
    #[must_use]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Replace the placements. Takes effect on the next [`cull`](Self::cull).
    pub fn set_transforms(&mut self, transforms: Vec<Mat4>) {
        self.transforms = transforms;
    }

    /// Upload the instances whose bounds touch `frustum` (all of them for
    /// an [`indexed`](Self::indexed) object). Returns how many were
    /// uploaded.
    pub fn cull(&mut self, context: &RenderContext, frustum: &Frustum) -> usize {
        let visible = frame_instances(
            &self.transforms,
            &self.model.bounds(),
            frustum,
            self.indexed,
        );
        let _ = self.instances.write(&context.device, &context.queue, &visible);
        visible.len()
    }

    /// Number of instances uploaded by the last [`cull`](Self::cull).
    #[must_use]
    pub fn visible_count(&self) -> u32 {
        self.instances.count() as u32
    }

    /// Bind the instance buffer at slot 1 and draw every visible instance.
    /// A single unindexed placement is additionally culled mesh by mesh.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, frustum: &Frustum) {
        if self.instances.is_empty() {
            return;
        }
        pass.set_vertex_buffer(1, self.instances.slice());
        match self.transforms.as_slice() {
            [transform] if !self.indexed => {
                let _ = self.model.draw_culled(pass, transform, frustum);
            }
            _ => self.model.draw_instanced(pass, 0..self.visible_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn translation(instance: &InstanceRaw) -> Vec3 {
        Vec3::from_slice(&instance.model[3][..3])
    }

    #[test]
    fn indexed_instances_keep_light_order_when_one_is_off_screen() {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let frustum = Frustum::from_view_projection(proj * view);
        let bounds = Bounds {
            center: Vec3::ZERO,
            radius: 0.5,
        };
        // Light 0 sits behind the camera.
        let lights = [
            Vec3::new(0.0, 0.0, 50.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];
        let transforms: Vec<Mat4> =
            lights.iter().map(|&p| Mat4::from_translation(p)).collect();

        let markers = frame_instances(&transforms, &bounds, &frustum, true);
        assert_eq!(markers.len(), lights.len());
        for (index, light) in lights.iter().enumerate() {
            assert_eq!(translation(&markers[index]), *light);
        }

        let culled = frame_instances(&transforms, &bounds, &frustum, false);
        assert_eq!(culled.len(), 2);
        assert_eq!(translation(&culled[0]), lights[1]);
    }
}
