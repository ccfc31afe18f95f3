//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable buffers, material
//! textures with their dedup cache, and shader composition.

/// Growable typed GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Bind-group-layout helpers and the lit-mesh pipeline factory.
pub mod pipeline;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Sampled textures with CPU-built mip chains, and the depth attachment.
pub mod texture;
/// Path-keyed texture deduplication.
pub mod texture_cache;

pub use dynamic_buffer::GrowableBuffer;
pub use render_context::{RenderContext, RenderContextError};
pub use shader_composer::ShaderComposer;
pub use texture::{DepthTexture, GpuTexture};
pub use texture_cache::TextureCache;
