//! Phong light block shared by every lit shader (bind group 1).
//!
//! Layouts follow WGSL uniform rules via `encase`; the matching WGSL
//! declarations live in `assets/shaders/modules/lighting.wgsl`.

use encase::{ShaderType, UniformBuffer};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::error::MeshviewError;
use crate::gpu::pipeline;
use crate::gpu::render_context::RenderContext;
use crate::options::LightingOptions;

/// Point-light slots in the uniform block.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Light with a direction and no position.
#[derive(Debug, Clone, Copy, PartialEq, Default, ShaderType)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    /// Ambient color.
    pub ambient: Vec3,
    /// Diffuse color.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
}

/// Omni light with distance falloff.
#[derive(Debug, Clone, Copy, PartialEq, Default, ShaderType)]
pub struct PointLight {
    /// World-space position.
    pub position: Vec3,
    /// Ambient color.
    pub ambient: Vec3,
    /// Diffuse color.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
    /// Constant falloff coefficient.
    pub constant_falloff: f32,
    /// Linear falloff coefficient.
    pub linear_falloff: f32,
    /// Quadratic falloff coefficient.
    pub quadratic_falloff: f32,
}

/// Cone light. Cutoffs are stored as cosines of the half-angles.
#[derive(Debug, Clone, Copy, PartialEq, Default, ShaderType)]
pub struct SpotLight {
    /// World-space position.
    pub position: Vec3,
    /// Cone axis, normalized.
    pub direction: Vec3,
    /// Ambient color.
    pub ambient: Vec3,
    /// Diffuse color.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
    /// Cosine of the full-intensity half-angle.
    pub cutoff: f32,
    /// Cosine of the zero-intensity half-angle.
    pub outer_cutoff: f32,
    /// Constant falloff coefficient.
    pub constant_falloff: f32,
    /// Linear falloff coefficient.
    pub linear_falloff: f32,
    /// Quadratic falloff coefficient.
    pub quadratic_falloff: f32,
}

/// Distance attenuation `1 / (c + l·d + q·d²)` of a point light.
#[must_use]
pub fn attenuation(light: &PointLight, distance: f32) -> f32 {
    falloff(
        light.constant_falloff,
        light.linear_falloff,
        light.quadratic_falloff,
        distance,
    )
}

fn falloff(constant: f32, linear: f32, quadratic: f32, distance: f32) -> f32 {
    (constant + linear * distance + quadratic * distance * distance).recip()
}

/// Soft-edged cone factor for a fragment whose direction from the light
/// makes an angle with cosine `cos_theta` to the cone axis: 1 inside the
/// inner cone, 0 outside the outer cone, linear in cosine between.
#[must_use]
pub fn spot_intensity(light: &SpotLight, cos_theta: f32) -> f32 {
    let epsilon = light.cutoff - light.outer_cutoff;
    if epsilon <= 0.0 {
        return if cos_theta >= light.cutoff { 1.0 } else { 0.0 };
    }
    ((cos_theta - light.outer_cutoff) / epsilon).clamp(0.0, 1.0)
}

impl SpotLight {
    /// Distance attenuation of this light.
    #[must_use]
    pub fn attenuation(&self, distance: f32) -> f32 {
        falloff(
            self.constant_falloff,
            self.linear_falloff,
            self.quadratic_falloff,
            distance,
        )
    }
}

/// The complete light block.
#[derive(Debug, Clone, Copy, PartialEq, Default, ShaderType)]
pub struct LightingUniform {
    /// Camera position for specular terms.
    pub view_position: Vec3,
    /// Number of valid entries in `points`.
    pub point_count: u32,
    /// The directional light.
    pub directional: DirectionalLight,
    /// Point lights; only the first `point_count` are shaded.
    pub points: [PointLight; MAX_POINT_LIGHTS],
    /// The flashlight.
    pub spot: SpotLight,
    /// Nonzero when the flashlight contributes.
    pub spot_enabled: u32,
}

impl LightingUniform {
    /// Build the block from options, with the flashlight at the camera.
    #[must_use]
    pub fn from_options(
        options: &LightingOptions,
        camera_position: Vec3,
        camera_front: Vec3,
    ) -> Self {
        let dir = &options.directional;
        let directional = DirectionalLight {
            direction: Vec3::from(dir.direction).normalize_or(Vec3::NEG_Y),
            ambient: Vec3::splat(dir.ambient),
            diffuse: Vec3::splat(dir.diffuse),
            specular: Vec3::splat(dir.specular),
        };

        if options.point_lights.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights configured; only the first {MAX_POINT_LIGHTS} \
                 are used",
                options.point_lights.len()
            );
        }
        let mut points = [PointLight::default(); MAX_POINT_LIGHTS];
        for (slot, light) in points.iter_mut().zip(&options.point_lights) {
            let color = Vec3::from(light.color);
            *slot = PointLight {
                position: Vec3::from(light.position),
                ambient: color * light.ambient,
                diffuse: color * light.diffuse,
                specular: color * light.specular,
                constant_falloff: light.constant,
                linear_falloff: light.linear,
                quadratic_falloff: light.quadratic,
            };
        }
        let point_count = options.point_lights.len().min(MAX_POINT_LIGHTS) as u32;

        let flash = &options.flashlight;
        let spot = SpotLight {
            position: camera_position,
            direction: camera_front,
            ambient: Vec3::splat(flash.ambient),
            diffuse: Vec3::splat(flash.diffuse),
            specular: Vec3::splat(flash.specular),
            cutoff: flash.cutoff_degrees.to_radians().cos(),
            outer_cutoff: flash.outer_cutoff_degrees.to_radians().cos(),
            constant_falloff: flash.constant,
            linear_falloff: flash.linear,
            quadratic_falloff: flash.quadratic,
        };

        Self {
            view_position: camera_position,
            point_count,
            directional,
            points,
            spot,
            spot_enabled: u32::from(flash.enabled),
        }
    }

    /// Move the view position and the flashlight to the camera.
    pub fn follow_camera(&mut self, position: Vec3, front: Vec3) {
        self.view_position = position;
        self.spot.position = position;
        self.spot.direction = front;
    }

    /// Positions of the active point lights.
    #[must_use]
    pub fn point_positions(&self) -> Vec<Vec3> {
        self.points[..self.point_count as usize]
            .iter()
            .map(|p| p.position)
            .collect()
    }

    /// Serialize with uniform-buffer layout.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Uniform`] if `encase` rejects the layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MeshviewError> {
        let mut buffer = UniformBuffer::new(Vec::<u8>::new());
        buffer
            .write(self)
            .map_err(|e| MeshviewError::Uniform(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

/// GPU-side light block: uniform buffer, bind group layout and bind group.
pub struct Lighting {
    /// CPU copy of the block.
    pub uniform: LightingUniform,
    /// Uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (single uniform at binding 0).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Create the light block from options.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Uniform`] if the block can't be serialized.
    pub fn new(
        context: &RenderContext,
        options: &LightingOptions,
    ) -> Result<Self, MeshviewError> {
        let uniform =
            LightingUniform::from_options(options, Vec3::ZERO, Vec3::NEG_Z);

        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: &uniform.to_bytes()?,
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[pipeline::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                )],
            },
        );

        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Lighting Bind Group"),
            });

        Ok(Self {
            uniform,
            buffer,
            layout,
            bind_group,
        })
    }

    /// Replace every light from new options, keeping the camera attachment.
    pub fn set_options(&mut self, options: &LightingOptions) {
        self.uniform = LightingUniform::from_options(
            options,
            self.uniform.view_position,
            self.uniform.spot.direction,
        );
    }

    /// Flashlight follows the camera (call each frame after camera updates).
    pub fn update_camera(&mut self, position: Vec3, front: Vec3) {
        self.uniform.follow_camera(position, front);
    }

    /// Upload the CPU copy.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Uniform`] if the block can't be serialized.
    pub fn update_gpu(&self, queue: &wgpu::Queue) -> Result<(), MeshviewError> {
        queue.write_buffer(&self.buffer, 0, &self.uniform.to_bytes()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use encase::ShaderSize;

    use super::*;
    use crate::options::PointLightOptions;

    #[test]
    fn uniform_sizes_match_padded_layout() {
        assert_eq!(DirectionalLight::SHADER_SIZE.get(), 64);
        assert_eq!(PointLight::SHADER_SIZE.get(), 80);
        assert_eq!(SpotLight::SHADER_SIZE.get(), 96);
        assert_eq!(LightingUniform::SHADER_SIZE.get(), 512);
    }

    #[test]
    fn serialized_block_has_shader_size() {
        let uniform = LightingUniform::from_options(
            &LightingOptions::default(),
            Vec3::ZERO,
            Vec3::NEG_Z,
        );
        assert_eq!(uniform.to_bytes().unwrap().len(), 512);
    }

    #[test]
    fn attenuation_is_one_over_quadratic() {
        let light = PointLight {
            constant_falloff: 1.0,
            linear_falloff: 0.09,
            quadratic_falloff: 0.032,
            ..PointLight::default()
        };
        assert_eq!(attenuation(&light, 0.0), 1.0);
        let expected = 1.0 / (1.0 + 0.9 + 3.2);
        assert!((attenuation(&light, 10.0) - expected).abs() < 1e-6);
    }

    #[test]
    fn spot_cone_has_soft_edge() {
        let options = LightingOptions::default();
        let uniform =
            LightingUniform::from_options(&options, Vec3::ZERO, Vec3::NEG_Z);
        let spot = uniform.spot;
        assert_eq!(spot_intensity(&spot, 1.0), 1.0);
        assert_eq!(spot_intensity(&spot, spot.cutoff), 1.0);
        assert_eq!(spot_intensity(&spot, spot.outer_cutoff), 0.0);
        assert_eq!(spot_intensity(&spot, 0.0), 0.0);
        let mid = (spot.cutoff + spot.outer_cutoff) * 0.5;
        assert!((spot_intensity(&spot, mid) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn excess_point_lights_are_dropped() {
        let options = LightingOptions {
            point_lights: (0..6)
                .map(|i| PointLightOptions::at([i as f32, 0.0, 0.0]))
                .collect(),
            ..LightingOptions::default()
        };
        let uniform =
            LightingUniform::from_options(&options, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(uniform.point_count, 4);
        assert_eq!(uniform.point_positions().len(), 4);
        assert_eq!(uniform.points[3].position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn flashlight_tracks_camera() {
        let mut uniform = LightingUniform::from_options(
            &LightingOptions::default(),
            Vec3::ZERO,
            Vec3::NEG_Z,
        );
        uniform.follow_camera(Vec3::new(1.0, 2.0, 3.0), Vec3::X);
        assert_eq!(uniform.view_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(uniform.spot.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(uniform.spot.direction, Vec3::X);
        assert_eq!(uniform.spot_enabled, 1);
    }
}
