// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Fly-camera model viewer built on wgpu.
//!
//! meshview imports Wavefront OBJ models, flattens their scene graph into
//! GPU-ready meshes, and renders them with Phong lighting (directional,
//! point and flashlight), optional normal mapping, instanced drawing and
//! frustum culling.
//!
//! # Key entry points
//!
//! - [`Viewer`] - standalone window (feature `viewer`)
//! - [`renderer::SceneRenderer`] - frame orchestration over a
//!   [`gpu::RenderContext`]
//! - [`camera::CameraState`] - pure fly-camera math
//! - [`asset::walk`] - scene-graph flattening, no GPU needed
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Everything that can be computed without a device (camera transitions,
//! the scene-graph walk, texture-slot naming, light attenuation, instance
//! layouts) lives in plain functions over plain data. The GPU layer
//! uploads that data once; per frame only the camera and light uniforms
//! and the culled instance lists are written.

pub mod asset;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod input;
pub mod lighting;
pub mod mesh;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::MeshviewError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
