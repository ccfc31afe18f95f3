//! Shared wgpu boilerplate: bind-group-layout entries, depth state, and the
//! lit-mesh render pipeline.

use crate::error::MeshviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DEPTH_FORMAT;

/// Uniform buffer binding visible to the given stages.
#[must_use]
pub fn uniform_buffer(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Fragment-visible, filterable float 2D texture binding.
#[must_use]
pub fn texture_2d(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Fragment-visible filtering sampler binding.
#[must_use]
pub fn filtering_sampler(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Standard depth-stencil state used by all mesh pipelines.
#[must_use]
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Everything that distinguishes one mesh pipeline from another.
pub struct MeshPipelineDesc<'a> {
    /// Debug label.
    pub label: &'a str,
    /// WGSL source (may contain `#import`s).
    pub source: &'a str,
    /// File path reported in composition errors.
    pub file_path: &'a str,
    /// Bind group layouts, in group order.
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Vertex buffer layouts, in slot order.
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    /// Fill or line rasterization.
    pub polygon_mode: wgpu::PolygonMode,
    /// Faces to cull (counter-clockwise faces are front faces).
    pub cull_mode: Option<wgpu::Face>,
}

/// Create an indexed triangle-list pipeline with `vs_main` / `fs_main`
/// entry points, depth test `Less`, rendering to the surface format.
///
/// # Errors
///
/// Returns [`MeshviewError::Shader`] if the shader fails to compose.
pub fn create_mesh_pipeline(
    context: &RenderContext,
    composer: &mut ShaderComposer,
    desc: &MeshPipelineDesc<'_>,
) -> Result<wgpu::RenderPipeline, MeshviewError> {
    let label = desc.label;
    let shader =
        composer.compose(&context.device, label, desc.source, desc.file_path)?;

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Layout")),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        },
    );

    Ok(context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: desc.vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: desc.polygon_mode,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
}
