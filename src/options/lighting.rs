use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sun-like light with a direction and no falloff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Directional Light", inline)]
#[serde(default)]
pub struct DirectionalLightOptions {
    /// Direction the light travels (need not be normalized).
    #[schemars(skip)]
    pub direction: [f32; 3],
    /// Ambient term.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ambient: f32,
    /// Diffuse term.
    #[schemars(title = "Diffuse", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub diffuse: f32,
    /// Specular term.
    #[schemars(title = "Specular", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub specular: f32,
}

impl Default for DirectionalLightOptions {
    fn default() -> Self {
        Self {
            direction: [-0.2, -1.0, -0.3],
            ambient: 0.05,
            diffuse: 0.4,
            specular: 0.5,
        }
    }
}

/// Omni light with distance falloff `1 / (c + l·d + q·d²)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct PointLightOptions {
    /// World-space position.
    pub position: [f32; 3],
    /// Light color, multiplied into every term.
    pub color: [f32; 3],
    /// Ambient term.
    pub ambient: f32,
    /// Diffuse term.
    pub diffuse: f32,
    /// Specular term.
    pub specular: f32,
    /// Constant falloff coefficient.
    pub constant: f32,
    /// Linear falloff coefficient.
    pub linear: f32,
    /// Quadratic falloff coefficient.
    pub quadratic: f32,
}

impl Default for PointLightOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            ambient: 0.05,
            diffuse: 0.8,
            specular: 1.0,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl PointLightOptions {
    /// White light at `position` with default falloff.
    #[must_use]
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Spot light attached to the camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Flashlight", inline)]
#[serde(default)]
pub struct FlashlightOptions {
    /// Whether the flashlight contributes at all.
    #[schemars(title = "Flashlight")]
    pub enabled: bool,
    /// Full-intensity half-angle in degrees.
    #[schemars(title = "Inner Cone", range(min = 1.0, max = 60.0), extend("step" = 0.5))]
    pub cutoff_degrees: f32,
    /// Zero-intensity half-angle in degrees.
    #[schemars(title = "Outer Cone", range(min = 1.0, max = 60.0), extend("step" = 0.5))]
    pub outer_cutoff_degrees: f32,
    /// Ambient term.
    #[schemars(skip)]
    pub ambient: f32,
    /// Diffuse term.
    #[schemars(skip)]
    pub diffuse: f32,
    /// Specular term.
    #[schemars(skip)]
    pub specular: f32,
    /// Constant falloff coefficient.
    #[schemars(skip)]
    pub constant: f32,
    /// Linear falloff coefficient.
    #[schemars(skip)]
    pub linear: f32,
    /// Quadratic falloff coefficient.
    #[schemars(skip)]
    pub quadratic: f32,
}

impl Default for FlashlightOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff_degrees: 12.5,
            outer_cutoff_degrees: 15.0,
            ambient: 0.0,
            diffuse: 1.0,
            specular: 1.0,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Phong light set: one directional light, up to four point lights, and a
/// camera flashlight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
pub struct LightingOptions {
    /// The directional light.
    pub directional: DirectionalLightOptions,
    /// Point lights; entries past the fourth are ignored.
    #[schemars(skip)]
    pub point_lights: Vec<PointLightOptions>,
    /// The camera-attached spot light.
    pub flashlight: FlashlightOptions,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            directional: DirectionalLightOptions::default(),
            point_lights: vec![
                PointLightOptions::at([0.7, 0.2, 2.0]),
                PointLightOptions::at([2.3, -3.3, -4.0]),
                PointLightOptions::at([-4.0, 2.0, -12.0]),
                PointLightOptions::at([0.0, 0.0, -3.0]),
            ],
            flashlight: FlashlightOptions::default(),
        }
    }
}
