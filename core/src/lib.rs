//! Fixfunc Core - Backend interfaces for the immediate-mode front end
//!
//! This crate provides the collaborator traits and value types that the
//! immediate-mode render-state compiler is built against.
//!
//! # Architecture
//!
//! - [`GraphicsBackend`] - Resource creation (buffers, bindings, layouts, samplers)
//! - [`CommandRecorder`] - Draw/state command stream consumed at session end
//! - [`OfflineShaderCompiler`] - Turns shader source into a backend shader object
//! - [`ImmediateConfig`] - Tunables loaded from TOML

pub mod backend;
pub mod config;
pub mod error;
pub mod handles;
pub mod recorder;
pub mod shader;

pub use backend::{
    BindingBankDescription, BindingKind, BufferDescription, BufferUsage, DeviceCapabilities,
    GraphicsBackend, MemoryHeap, SamplerDescription, SamplerFilter, VertexAttribute,
    VertexFormat,
};
pub use config::{ConfigError, ImmediateConfig};
pub use error::BackendError;
pub use handles::{
    BindingHandle, BufferHandle, SamplerHandle, ShaderHandle, SignatureHandle, TextureHandle,
    VertexBindingHandle, VertexLayoutHandle,
};
pub use recorder::{
    BlendFactor, BlendOperation, ColorMask, CommandRecorder, CompareFunction, CullMode,
    FaceWinding, FixedFunctionState, PolygonMode, PrimitiveTopology, StencilOperation,
};
pub use shader::{OfflineShaderCompiler, ShaderCompileError, ShaderLanguage, ShaderSource, ShaderStage};
