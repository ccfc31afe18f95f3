use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{CameraMovement, CameraState};
use crate::camera::frustum::Frustum;
use crate::gpu::render_context::RenderContext;
use crate::options::CameraOptions;

/// Projection parameters that live outside the camera state: they belong to
/// the viewport, not to where the camera is looking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Projection {
    /// Projection for a `width` x `height` viewport.
    #[must_use]
    pub fn new(width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            znear,
            zfar,
        }
    }

    /// Update the aspect ratio. Zero-sized viewports (minimized windows) are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform holding the camera matrices and eye position.
pub struct CameraUniform {
    /// Combined projection * view matrix.
    pub view_proj: [[f32; 4]; 4],
    /// World-to-camera matrix.
    pub view: [[f32; 4]; 4],
    /// Camera-to-clip matrix.
    pub projection: [[f32; 4]; 4],
    /// Eye position in world space.
    pub position: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl CameraUniform {
    /// Build the uniform for a camera state and projection.
    #[must_use]
    pub fn from_state(state: &CameraState, projection: &Projection) -> Self {
        let view = state.view_matrix();
        let proj = state.projection_matrix(
            projection.aspect,
            projection.znear,
            projection.zfar,
        );
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: proj.to_cols_array_2d(),
            position: state.position.to_array(),
            _pad: 0.0,
        }
    }
}

/// Fly camera plus the GPU resources that expose it to shaders (bind group
/// 0 in every pipeline).
pub struct CameraController {
    state: CameraState,
    projection: Projection,
    constrain_pitch: bool,

    /// Uniform buffer holding [`CameraUniform`].
    pub buffer: wgpu::Buffer,
    /// Layout for the camera bind group.
    pub layout: wgpu::BindGroupLayout,
    /// Camera bind group.
    pub bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Create the controller and its uniform buffer from options.
    #[must_use]
    pub fn new(context: &RenderContext, options: &CameraOptions) -> Self {
        let state = options.state();
        let projection = Projection::new(
            context.config.width,
            context.config.height,
            options.znear,
            options.zfar,
        );
        let uniform = CameraUniform::from_state(&state, &projection);

        let buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Camera Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            state,
            projection,
            constrain_pitch: options.constrain_pitch,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Current camera state.
    #[must_use]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Replace the camera state wholesale (e.g. when loading a preset).
    pub fn set_state(&mut self, state: CameraState) {
        self.state = state;
    }

    /// Apply held movement directions for one frame.
    pub fn advance(&mut self, movements: &[CameraMovement], dt: f32) {
        self.state = movements
            .iter()
            .fold(self.state, |state, &dir| state.advance(dir, dt));
    }

    /// Turn by a mouse offset.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.state = self.state.look(dx, dy, self.constrain_pitch);
    }

    /// Change the field of view by a scroll offset.
    pub fn zoom(&mut self, delta: f32) {
        self.state = self.state.zoom(delta);
    }

    /// Eye position in world space.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Viewing direction in world space.
    #[must_use]
    pub fn front(&self) -> Vec3 {
        self.state.basis().front
    }

    /// Combined projection * view matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        let proj = self.state.projection_matrix(
            self.projection.aspect,
            self.projection.znear,
            self.projection.zfar,
        );
        proj * self.state.view_matrix()
    }

    /// Frustum of the current view, for culling.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.view_projection())
    }

    /// Upload the current matrices.
    pub fn update_gpu(&self, queue: &wgpu::Queue) {
        let uniform = CameraUniform::from_state(&self.state, &self.projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Track a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_ignores_zero_height() {
        let mut projection = Projection::new(800, 600, 0.1, 100.0);
        projection.resize(1024, 0);
        assert_eq!(projection.aspect, 800.0 / 600.0);
        projection.resize(1000, 500);
        assert_eq!(projection.aspect, 2.0);
    }

    #[test]
    fn uniform_layout_is_208_bytes() {
        assert_eq!(size_of::<CameraUniform>(), 208);
    }

    #[test]
    fn uniform_matches_state_matrices() {
        let state = CameraState::new(Vec3::new(0.0, 1.0, 5.0));
        let projection = Projection::new(800, 600, 0.1, 100.0);
        let uniform = CameraUniform::from_state(&state, &projection);

        let view = Mat4::from_cols_array_2d(&uniform.view);
        let proj = Mat4::from_cols_array_2d(&uniform.projection);
        let view_proj = Mat4::from_cols_array_2d(&uniform.view_proj);
        assert!(view.abs_diff_eq(state.view_matrix(), 1e-6));
        assert!((proj * view).abs_diff_eq(view_proj, 1e-6));
        assert_eq!(uniform.position, [0.0, 1.0, 5.0]);
    }
}
