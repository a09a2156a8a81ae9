//! Fixfunc Immediate - legacy immediate-mode rendering on an explicit backend
//!
//! Callers emit vertices one at a time, push and pop matrices, and toggle
//! fixed-function lighting, fog and material state. The [`ImmediateRenderer`]
//! compiles that stream into batched draws: state is resolved at primitive
//! boundaries, captured into a deferred command queue, and drained into a
//! [`CommandRecorder`](fixfunc_core::CommandRecorder) at session end with
//! redundant rebinds removed.

pub mod error;
pub mod graphics;
pub mod renderer;
pub mod shader_gen;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ImmediateError;
pub use graphics::{
    ExtraRenderingState, FogMode, ImmediateTopology, ImmediateVertex, LightState, LightingModel,
    LightingState, MaterialState, MatrixMode, RenderingState, SkinningState, TransformationState,
    MAX_BONES, MAX_LIGHTS,
};
pub use renderer::{ImmediateRenderer, LightDescription, MaterialDescription};
pub use shader_gen::{NagaShaderCompiler, ShaderCompilationKey, ShaderModuleRegistry};
pub use shared::{ImmediateObjectCache, SharedImmediateObjects};
