//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (window, camera, lighting, scene contents,
//! keybindings) are consolidated here. Options serialize to/from TOML so a
//! viewer setup can be stored and passed with `--options`.

mod camera;
mod lighting;
mod scene;
mod window;

use std::path::Path;

pub use camera::CameraOptions;
pub use lighting::{
    DirectionalLightOptions, FlashlightOptions, LightingOptions,
    PointLightOptions,
};
pub use scene::SceneOptions;
pub use window::WindowOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MeshviewError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Window and presentation settings.
    pub window: WindowOptions,
    /// Initial camera state and projection.
    pub camera: CameraOptions,
    /// Light set.
    pub lighting: LightingOptions,
    /// Scene contents.
    pub scene: SceneOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Io`] if the file can't be read and
    /// [`MeshviewError::OptionsParse`] if it isn't valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MeshviewError> {
        let content =
            std::fs::read_to_string(path).map_err(MeshviewError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, MeshviewError> {
        toml::from_str(content)
            .map_err(|e| MeshviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::OptionsParse`] if serialization fails and
    /// [`MeshviewError::Io`] if the file can't be written.
    pub fn save(&self, path: &Path) -> Result<(), MeshviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MeshviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MeshviewError::Io)?;
        }
        std::fs::write(path, content).map_err(MeshviewError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
movement_speed = 10.0

[scene]
model = "resources/objects/rock/rock.obj"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.movement_speed, 10.0);
        assert_eq!(
            opts.scene.model,
            Some(PathBuf::from("resources/objects/rock/rock.obj"))
        );
        // Everything else should be default
        assert_eq!(opts.camera.fov, 45.0);
        assert_eq!(opts.lighting.point_lights.len(), 4);
        assert_eq!(opts.window, WindowOptions::default());
    }

    #[test]
    fn camera_options_seed_the_state() {
        let opts = Options::from_toml(
            "[camera]\nposition = [1.0, 2.0, 3.0]\nyaw = 0.0\nfov = 30.0\n",
        )
        .unwrap();
        let state = opts.camera.state();
        assert_eq!(state.position, glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(state.yaw, 0.0);
        assert_eq!(state.fov, 30.0);
        assert!(state.basis().front.abs_diff_eq(glam::Vec3::X, 1e-6));
    }

    #[test]
    fn keybinding_overrides() {
        let opts = Options::from_toml(
            "[keybindings.bindings]\nKeyI = \"move_forward\"\n",
        )
        .unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyI"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
        assert_eq!(
            Options::default().keybindings.lookup("Escape"),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn malformed_toml_is_options_parse_error() {
        let result = Options::from_toml("[camera]\nfov = \"wide\"\n");
        assert!(matches!(result, Err(MeshviewError::OptionsParse(_))));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("meshview-presets-{}", std::process::id()));
        let opts = Options {
            scene: SceneOptions {
                wireframe: true,
                ..SceneOptions::default()
            },
            ..Options::default()
        };
        opts.save(&dir.join("wire.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), ["default", "wire"]);
        assert!(Options::load(&dir.join("wire.toml")).unwrap().scene.wireframe);
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(MeshviewError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("window"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("scene"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fov").is_some());
        assert!(camera.get("position").is_none());
    }
}
