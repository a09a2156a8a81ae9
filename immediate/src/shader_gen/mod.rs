//! Uber-shader permutation generation
//!
//! A single WGSL template covers every fixed-function feature combination.
//! Each permutation is selected by prepending an options header of `#define`
//! lines; the preprocessor resolves the feature switches before compilation.

mod error;
mod naga_compiler;
mod preprocess;

pub use error::PreprocessError;
pub use naga_compiler::{CompiledModule, NagaShaderCompiler, ShaderModuleRegistry};
pub use preprocess::{PreprocessedSource, preprocess};

use fixfunc_core::ShaderStage;

use crate::graphics::{LightingModel, RenderingState};

/// Feature-complete shader template
pub const UBER_SHADER_TEMPLATE: &str = include_str!("shaders/uber_shader.wgsl");

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

/// Entry point of the uber-shader for `stage`
pub fn entry_point(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => VERTEX_ENTRY_POINT,
        ShaderStage::Fragment => FRAGMENT_ENTRY_POINT,
    }
}

/// Feature tuple selecting one shader permutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderCompilationKey {
    pub flat_shading: bool,
    pub texturing_enabled: bool,
    pub skinning_enabled: bool,
    pub lighting_enabled: bool,
    pub lighting_model: LightingModel,
}

impl ShaderCompilationKey {
    pub fn from_state(state: &RenderingState) -> Self {
        Self {
            flat_shading: state.flat_shading,
            texturing_enabled: state.texturing_enabled,
            skinning_enabled: state.skinning_enabled,
            lighting_enabled: state.lighting_enabled,
            lighting_model: state.lighting_model,
        }
    }

    /// Every key the renderer can produce
    pub fn all() -> impl Iterator<Item = Self> {
        (0u32..16).flat_map(|bits| {
            [
                LightingModel::PerVertex,
                LightingModel::PerFragment,
                LightingModel::MetallicRoughness,
            ]
            .into_iter()
            .map(move |lighting_model| Self {
                flat_shading: bits & 1 != 0,
                texturing_enabled: bits & 2 != 0,
                skinning_enabled: bits & 4 != 0,
                lighting_enabled: bits & 8 != 0,
                lighting_model,
            })
        })
    }

    /// `#version` line, stage selection and one `#define` per enabled feature
    pub fn options_header(&self, stage: ShaderStage) -> String {
        let mut header = String::from("#version wgsl\n");
        header.push_str(match stage {
            ShaderStage::Vertex => "#define BUILD_VERTEX_SHADER\n",
            ShaderStage::Fragment => "#define BUILD_FRAGMENT_SHADER\n",
        });
        if self.flat_shading {
            header.push_str("#define FLAT_SHADING\n");
        }
        if self.texturing_enabled {
            header.push_str("#define TEXTURING_ENABLED\n");
        }
        if self.skinning_enabled {
            header.push_str("#define SKINNING_ENABLED\n");
        }
        if self.lighting_enabled {
            header.push_str("#define LIGHTING_ENABLED\n");
            header.push_str(match self.lighting_model {
                LightingModel::PerVertex => "#define PER_VERTEX_LIGHTING\n",
                LightingModel::PerFragment => "#define PER_FRAGMENT_LIGHTING\n",
                LightingModel::MetallicRoughness => "#define PBR_METALLIC_ROUGHNESS\n",
            });
        }
        header
    }

    /// Options header followed by the uber-shader template
    pub fn shader_source(&self, stage: ShaderStage) -> String {
        let mut source = self.options_header(stage);
        source.push_str(UBER_SHADER_TEMPLATE);
        source
    }
}
