//! Crate-level error types.

use std::fmt;
use std::path::PathBuf;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the meshview crate.
#[derive(Debug)]
pub enum MeshviewError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// The asset importer rejected a model, or the imported scene graph is
    /// malformed (dangling mesh/material/vertex indices).
    ModelLoad(String),
    /// A texture image could not be read or decoded.
    TextureLoad {
        /// Resolved path of the image file.
        path: PathBuf,
        /// Decoder error.
        source: image::ImageError,
    },
    /// WGSL composition or validation failure.
    Shader(String),
    /// Uniform block serialization failure.
    Uniform(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for MeshviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            Self::TextureLoad { path, source } => {
                write!(f, "texture load error ({}): {source}", path.display())
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Uniform(msg) => write!(f, "uniform layout error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MeshviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::TextureLoad { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for MeshviewError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for MeshviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
