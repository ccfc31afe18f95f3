use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::MeshviewError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import meshview::camera` / `#import meshview::lighting` to pull in
/// shared code. The composer produces `naga::Module` IR directly, skipping
/// WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path).
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

impl ShaderComposer {
    /// Create a composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, MeshviewError> {
        let mut composer = Composer::default();

        for m in MODULES {
            let registered = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map(|_| ());
            if let Err(e) = registered {
                return Err(MeshviewError::Shader(format!(
                    "failed to register shader module '{}': {}",
                    m.file_path,
                    e.emit_to_string(&composer)
                )));
            }
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Shader`] with the composer's diagnostic if
    /// the source fails to parse, resolve imports, or validate.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, MeshviewError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Shader`] on any composition failure.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, MeshviewError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                MeshviewError::Shader(format!(
                    "failed to compose '{file_path}': {}",
                    e.emit_to_string(&self.composer)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every pipeline shader shipped with the crate.
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (include_str!("../../assets/shaders/mesh.wgsl"), "mesh.wgsl"),
            (
                include_str!("../../assets/shaders/light_marker.wgsl"),
                "light_marker.wgsl",
            ),
        ]
    }

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{e}"));
            assert!(module.entry_points.iter().any(|ep| ep.name == "vs_main"));
            assert!(module.entry_points.iter().any(|ep| ep.name == "fs_main"));
        }
    }

    #[test]
    fn broken_source_is_an_error_not_a_panic() {
        let mut composer = ShaderComposer::new().unwrap();
        let result = composer.compose_naga(
            "#import meshview::camera\n@fragment fn fs_main() -> { }",
            "broken.wgsl",
        );
        match result {
            Err(MeshviewError::Shader(msg)) => {
                assert!(msg.contains("broken.wgsl"));
            }
            other => panic!("expected shader error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_import_is_an_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let result = composer.compose_naga(
            "#import meshview::nope::thing\n\
             @fragment fn fs_main() -> @location(0) vec4<f32> { return thing(); }",
            "missing_import.wgsl",
        );
        assert!(
            matches!(result, Err(MeshviewError::Shader(_))),
            "expected shader error, got {result:?}"
        );
    }
}
