use crate::asset::Vertex;
use crate::error::MeshviewError;
use crate::gpu::pipeline::{create_mesh_pipeline, MeshPipelineDesc};
use crate::gpu::render_context::RenderContext;
use crate::gpu::ShaderComposer;
use crate::scene::InstanceRaw;

const MESH_SHADER: &str = include_str!("../../assets/shaders/mesh.wgsl");
const MARKER_SHADER: &str =
    include_str!("../../assets/shaders/light_marker.wgsl");

/// Every render pipeline the scene renderer switches between.
pub(crate) struct MeshPipelines {
    /// Lit, textured, filled triangles.
    pub lit: wgpu::RenderPipeline,
    /// Same shading rasterized as lines; `None` without
    /// `POLYGON_MODE_LINE`.
    pub wireframe: Option<wgpu::RenderPipeline>,
    /// Unlit cubes at the point lights.
    pub marker: wgpu::RenderPipeline,
}

impl MeshPipelines {
    /// Build all pipelines. `layouts` are the camera, lighting and material
    /// bind group layouts, in group order.
    pub(crate) fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        layouts: &[&wgpu::BindGroupLayout; 3],
    ) -> Result<Self, MeshviewError> {
        let vertex_layouts = [Vertex::layout(), InstanceRaw::layout()];
        let lit_desc = MeshPipelineDesc {
            label: "Lit Mesh Pipeline",
            source: MESH_SHADER,
            file_path: "mesh.wgsl",
            bind_group_layouts: layouts,
            vertex_layouts: &vertex_layouts,
            polygon_mode: wgpu::PolygonMode::Fill,
            cull_mode: Some(wgpu::Face::Back),
        };
        let lit = create_mesh_pipeline(context, composer, &lit_desc)?;

        let wireframe = if context.supports_wireframe() {
            Some(create_mesh_pipeline(
                context,
                composer,
                &MeshPipelineDesc {
                    label: "Wireframe Mesh Pipeline",
                    polygon_mode: wgpu::PolygonMode::Line,
                    cull_mode: None,
                    ..lit_desc
                },
            )?)
        } else {
            log::info!("adapter lacks POLYGON_MODE_LINE; wireframe disabled");
            None
        };

        let marker = create_mesh_pipeline(
            context,
            composer,
            &MeshPipelineDesc {
                label: "Light Marker Pipeline",
                source: MARKER_SHADER,
                file_path: "light_marker.wgsl",
                ..lit_desc
            },
        )?;

        Ok(Self {
            lit,
            wireframe,
            marker,
        })
    }

    /// Pipeline for scene geometry in the requested mode, falling back to
    /// the filled pipeline when wireframe is unavailable.
    pub(crate) fn scene(&self, wireframe: bool) -> &wgpu::RenderPipeline {
        match (&self.wireframe, wireframe) {
            (Some(pipeline), true) => pipeline,
            _ => &self.lit,
        }
    }
}
