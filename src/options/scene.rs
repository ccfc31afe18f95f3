use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
/// What to draw and how.
pub struct SceneOptions {
    /// Model drawn once at the origin; the built-in box and floor plane are
    /// drawn instead when unset.
    #[schemars(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    /// Uniform scale applied to `model`.
    #[schemars(skip)]
    pub model_scale: f32,
    /// Translation applied to `model`.
    #[schemars(skip)]
    pub model_offset: [f32; 3],
    /// Model instanced around a ring, e.g. an asteroid belt.
    #[schemars(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instanced_model: Option<PathBuf>,
    /// Number of ring instances.
    #[schemars(title = "Instances", range(min = 0, max = 100_000))]
    pub instance_count: u32,
    /// Ring radius.
    #[schemars(title = "Ring Radius", range(min = 1.0, max = 500.0), extend("step" = 1.0))]
    pub ring_radius: f32,
    /// Maximum random displacement from the ring.
    #[schemars(title = "Ring Spread", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    pub ring_offset: f32,
    /// Seed for the ring layout.
    #[schemars(skip)]
    pub ring_seed: u64,
    /// Draw a small cube at every point light.
    #[schemars(title = "Light Markers")]
    pub show_light_markers: bool,
    /// Background color (linear RGB).
    #[schemars(skip)]
    pub clear_color: [f64; 3],
    /// Start in wireframe mode.
    #[schemars(title = "Wireframe")]
    pub wireframe: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            model: None,
            model_scale: 1.0,
            model_offset: [0.0, 0.0, 0.0],
            instanced_model: None,
            instance_count: 1000,
            ring_radius: 50.0,
            ring_offset: 2.5,
            ring_seed: 1,
            show_light_markers: true,
            clear_color: [0.1, 0.1, 0.1],
            wireframe: false,
        }
    }
}
