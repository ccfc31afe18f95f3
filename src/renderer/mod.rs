//! Frame orchestration: owns the GPU context, camera, lights and scene
//! objects, and records one render pass per frame.

mod command;
mod pipelines;

use std::path::Path;

use glam::{Mat4, Vec3};

pub use self::command::ViewerCommand;
use self::pipelines::MeshPipelines;
use crate::asset::{MeshData, ModelData};
use crate::camera::{CameraController, CameraMovement};
use crate::error::MeshviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::material_sampler;
use crate::gpu::{DepthTexture, ShaderComposer, TextureCache};
use crate::lighting::Lighting;
use crate::mesh::{material_layout, Model};
use crate::options::{Options, SceneOptions};
use crate::scene::{asteroid_ring, SceneObject};

/// Edge length of the cubes drawn at point lights.
const MARKER_SIZE: f32 = 0.2;

/// Half extent of the floor in the built-in scene.
const FLOOR_HALF_EXTENT: f32 = 10.0;

/// Transform applied to the primary model from scene options.
fn model_transform(scene: &SceneOptions) -> Mat4 {
    Mat4::from_translation(Vec3::from(scene.model_offset))
        * Mat4::from_scale(Vec3::splat(scene.model_scale))
}

/// Ring layout described by scene options.
fn ring_transforms(scene: &SceneOptions) -> Vec<Mat4> {
    asteroid_ring(
        scene.instance_count as usize,
        scene.ring_radius,
        scene.ring_offset,
        scene.ring_seed,
    )
}

/// Marker transforms for the given light positions.
fn marker_transforms(positions: &[Vec3]) -> Vec<Mat4> {
    positions
        .iter()
        .map(|&p| {
            Mat4::from_translation(p) * Mat4::from_scale(Vec3::splat(MARKER_SIZE))
        })
        .collect()
}

fn to_wgpu_color(rgb: [f64; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
        a: 1.0,
    }
}

/// Owns everything needed to draw the scene into a surface.
pub struct SceneRenderer {
    context: RenderContext,
    camera: CameraController,
    lighting: Lighting,
    depth: DepthTexture,
    pipelines: MeshPipelines,
    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: TextureCache,

    objects: Vec<SceneObject>,
    instanced: Option<SceneObject>,
    instance_transforms: Vec<Mat4>,
    markers: SceneObject,

    model_transform: Mat4,
    wireframe: bool,
    show_light_markers: bool,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Build pipelines and load the scene described by `options`: the
    /// configured model (or the built-in box and floor), the instanced ring
    /// model if any, and a marker per point light.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Shader`] if a pipeline shader fails to
    /// compose, [`MeshviewError::Uniform`] if the light block can't be
    /// serialized, and [`MeshviewError::ModelLoad`] if a configured model
    /// can't be imported.
    pub fn new(
        context: RenderContext,
        options: &Options,
    ) -> Result<Self, MeshviewError> {
        let mut composer = ShaderComposer::new()?;
        let camera = CameraController::new(&context, &options.camera);
        let mut lighting = Lighting::new(&context, &options.lighting)?;
        lighting.update_camera(camera.position(), camera.front());

        let (width, height) = context.size();
        let depth = DepthTexture::new(&context.device, width, height);
        let material_layout = material_layout(&context.device);
        let sampler = material_sampler(&context.device);
        let pipelines = MeshPipelines::new(
            &context,
            &mut composer,
            &[&camera.layout, &lighting.layout, &material_layout],
        )?;

        let mut textures = TextureCache::new();
        let marker_model = Model::from_data(
            &context,
            &mut textures,
            &ModelData {
                meshes: vec![MeshData::unit_box()],
                ..ModelData::default()
            },
            &material_layout,
            &sampler,
        )?;
        let markers = SceneObject::indexed(
            &context,
            "Light Markers",
            marker_model,
            marker_transforms(&lighting.uniform.point_positions()),
        );

        let mut renderer = Self {
            context,
            camera,
            lighting,
            depth,
            pipelines,
            material_layout,
            sampler,
            textures,
            objects: Vec::new(),
            instanced: None,
            instance_transforms: ring_transforms(&options.scene),
            markers,
            model_transform: model_transform(&options.scene),
            wireframe: false,
            show_light_markers: options.scene.show_light_markers,
            clear_color: to_wgpu_color(options.scene.clear_color),
        };

        match &options.scene.model {
            Some(path) => renderer.load_model(path)?,
            None => renderer.load_builtin_scene()?,
        }
        if let Some(path) = &options.scene.instanced_model {
            renderer.load_instanced_model(path)?;
        }
        if options.scene.wireframe {
            renderer.execute(ViewerCommand::ToggleWireframe);
        }

        Ok(renderer)
    }

    /// Replace the placed geometry with the box-and-floor scene.
    ///
    /// # Errors
    ///
    /// Propagates upload failures.
    pub fn load_builtin_scene(&mut self) -> Result<(), MeshviewError> {
        let cube = self.upload(vec![MeshData::unit_box()])?;
        let floor =
            self.upload(vec![MeshData::plane(FLOOR_HALF_EXTENT, FLOOR_HALF_EXTENT)])?;
        self.objects = vec![
            SceneObject::single(&self.context, "Box", cube, Mat4::IDENTITY),
            SceneObject::single(
                &self.context,
                "Floor",
                floor,
                Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0)),
            ),
        ];
        Ok(())
    }

    fn upload(&mut self, meshes: Vec<MeshData>) -> Result<Model, MeshviewError> {
        Model::from_data(
            &self.context,
            &mut self.textures,
            &ModelData {
                meshes,
                ..ModelData::default()
            },
            &self.material_layout,
            &self.sampler,
        )
    }

    fn import(&mut self, path: &Path) -> Result<Model, MeshviewError> {
        Model::load(
            &self.context,
            &mut self.textures,
            path,
            &self.material_layout,
            &self.sampler,
        )
    }

    /// Load `path` and make it the placed model, replacing whatever was
    /// placed before. On error the current scene is kept.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::ModelLoad`] if the file can't be imported.
    pub fn load_model(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), MeshviewError> {
        let path = path.as_ref();
        let model = self.import(path)?;
        self.objects = vec![SceneObject::single(
            &self.context,
            path.display().to_string(),
            model,
            self.model_transform,
        )];
        Ok(())
    }

    /// Load `path` as the instanced model, placed at the current instance
    /// transforms.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::ModelLoad`] if the file can't be imported.
    pub fn load_instanced_model(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), MeshviewError> {
        let path = path.as_ref();
        let model = self.import(path)?;
        log::info!(
            "instancing {} x{}",
            path.display(),
            self.instance_transforms.len()
        );
        self.instanced = Some(SceneObject::instanced(
            &self.context,
            path.display().to_string(),
            model,
            self.instance_transforms.clone(),
        ));
        Ok(())
    }

    /// Replace the instance transforms of the instanced model.
    pub fn set_instances(&mut self, transforms: Vec<Mat4>) {
        if let Some(object) = &mut self.instanced {
            object.set_transforms(transforms.clone());
        }
        self.instance_transforms = transforms;
    }

    /// Apply a discrete command. [`ViewerCommand::Quit`] is left to the
    /// owner of the event loop.
    pub fn execute(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::Look { dx, dy } => self.camera.look(dx, dy),
            ViewerCommand::Zoom { delta } => self.camera.zoom(delta),
            ViewerCommand::ToggleWireframe => {
                if self.pipelines.wireframe.is_some() {
                    self.wireframe = !self.wireframe;
                    log::info!("wireframe: {}", self.wireframe);
                } else {
                    log::warn!("wireframe rendering not supported by this GPU");
                }
            }
            ViewerCommand::Quit => {}
        }
    }

    /// Advance the camera by the held movements over `dt` seconds and keep
    /// the flashlight attached to it.
    pub fn update(&mut self, dt: f32, movements: &[CameraMovement]) {
        self.camera.advance(movements, dt);
        self.lighting
            .update_camera(self.camera.position(), self.camera.front());
    }

    /// Render one frame to the surface and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain texture can't be
    /// acquired; the caller decides whether to reconfigure or exit.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.camera.update_gpu(&self.context.queue);
        if let Err(e) = self.lighting.update_gpu(&self.context.queue) {
            log::error!("{e}");
        }

        let frustum = self.camera.frustum();
        for object in &mut self.objects {
            let _ = object.cull(&self.context, &frustum);
        }
        if let Some(object) = &mut self.instanced {
            let _ = object.cull(&self.context, &frustum);
        }

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            pass.set_pipeline(self.pipelines.scene(self.wireframe));
            pass.set_bind_group(0, &self.camera.bind_group, &[]);
            pass.set_bind_group(1, &self.lighting.bind_group, &[]);
            for object in self.objects.iter().chain(&self.instanced) {
                object.draw(&mut pass, &frustum);
            }

            if self.show_light_markers {
                pass.set_pipeline(&self.pipelines.marker);
                self.markers.draw(&mut pass, &frustum);
            }
        }

        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    /// Resize the surface, depth buffer and projection. Zero sizes are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.camera.resize(width, height);
            self.depth = DepthTexture::new(&self.context.device, width, height);
        }
    }

    /// Reconfigure the surface at its current size after it was lost or
    /// became outdated.
    pub fn reconfigure(&self) {
        self.context.reconfigure();
    }

    /// The GPU context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// The camera controller.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Whether the wireframe pipeline is active.
    #[must_use]
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Number of distinct textures uploaded so far.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_transform_scales_then_offsets() {
        let scene = SceneOptions {
            model_scale: 2.0,
            model_offset: [0.0, -1.0, 0.0],
            ..SceneOptions::default()
        };
        let p = model_transform(&scene).transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(2.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn ring_follows_scene_options() {
        let scene = SceneOptions {
            instance_count: 12,
            ..SceneOptions::default()
        };
        assert_eq!(ring_transforms(&scene).len(), 12);
        assert_eq!(ring_transforms(&scene), ring_transforms(&scene));
    }

    #[test]
    fn markers_sit_at_lights() {
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO];
        let transforms = marker_transforms(&positions);
        assert_eq!(transforms.len(), 2);
        assert!(transforms[0]
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(positions[0], 1e-6));
        let corner = transforms[1].transform_point3(Vec3::splat(0.5));
        assert!(corner.abs_diff_eq(Vec3::splat(0.5 * MARKER_SIZE), 1e-6));
    }

    #[test]
    fn clear_color_is_opaque() {
        let color = to_wgpu_color([0.1, 0.2, 0.3]);
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 1.0));
    }
}
