//! Offline shader compiler interface

use crate::handles::ShaderHandle;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex = 0,
    Fragment = 1,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderLanguage {
    /// WGSL with `#define`/`#ifdef` feature switches
    Wgsl,
    /// Whatever the backend consumes natively
    DeviceShader,
}

/// Source handed to an [`OfflineShaderCompiler`]
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource<'a> {
    pub language: ShaderLanguage,
    pub stage: ShaderStage,
    pub text: &'a str,
}

/// Compilation failure carrying the compiler diagnostic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shader compilation failed:\n{log}")]
pub struct ShaderCompileError {
    pub log: String,
}

impl ShaderCompileError {
    pub fn new(log: impl Into<String>) -> Self {
        Self { log: log.into() }
    }
}

pub trait OfflineShaderCompiler {
    /// Compile `source` to `target` and return the resulting shader object
    fn compile(
        &mut self,
        source: &ShaderSource<'_>,
        target: ShaderLanguage,
    ) -> Result<ShaderHandle, ShaderCompileError>;
}
