//! naga-backed offline shader compiler
//!
//! Preprocesses, parses and validates WGSL, then registers the resulting module
//! so a backend can turn the returned [`ShaderHandle`] into a native shader.

use std::sync::{Arc, Mutex, PoisonError};

use fixfunc_core::{
    OfflineShaderCompiler, ShaderCompileError, ShaderHandle, ShaderLanguage, ShaderSource,
    ShaderStage,
};
use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use super::preprocess::preprocess;

/// A validated single-stage module
#[derive(Debug)]
pub struct CompiledModule {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub module: naga::Module,
    pub info: ModuleInfo,
    /// Preprocessed WGSL the module was parsed from
    pub source: String,
}

/// Modules produced by every [`NagaShaderCompiler`] sharing this registry.
///
/// `ShaderHandle(n)` refers to the `n`th registered module.
#[derive(Debug, Default)]
pub struct ShaderModuleRegistry {
    modules: Mutex<Vec<Arc<CompiledModule>>>,
}

impl ShaderModuleRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn register(&self, module: CompiledModule) -> ShaderHandle {
        let mut modules = self.modules.lock().unwrap_or_else(PoisonError::into_inner);
        modules.push(Arc::new(module));
        ShaderHandle((modules.len() - 1) as u32)
    }

    pub fn get(&self, handle: ShaderHandle) -> Option<Arc<CompiledModule>> {
        let modules = self.modules.lock().unwrap_or_else(PoisonError::into_inner);
        modules.get(handle.raw() as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct NagaShaderCompiler {
    registry: Arc<ShaderModuleRegistry>,
    validator: Validator,
}

impl NagaShaderCompiler {
    pub fn new(registry: Arc<ShaderModuleRegistry>) -> Self {
        Self {
            registry,
            validator: Validator::new(ValidationFlags::all(), Capabilities::all()),
        }
    }

    /// Preprocess, parse and validate `text`, requiring an entry point for `stage`
    pub fn compile_module(
        &mut self,
        text: &str,
        stage: ShaderStage,
    ) -> Result<CompiledModule, ShaderCompileError> {
        let preprocessed = preprocess(text)
            .map_err(|e| ShaderCompileError::new(format!("Preprocess error: {}", e)))?;
        let source = preprocessed.source;

        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|e| ShaderCompileError::new(e.emit_to_string(&source)))?;

        let info = self
            .validator
            .validate(&module)
            .map_err(|e| ShaderCompileError::new(format!("Validation error: {:?}", e)))?;

        let naga_stage = match stage {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        };
        let entry_point = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga_stage)
            .map(|ep| ep.name.clone())
            .ok_or_else(|| {
                ShaderCompileError::new(format!("No {:?} entry point in shader", stage))
            })?;

        Ok(CompiledModule {
            stage,
            entry_point,
            module,
            info,
            source,
        })
    }
}

impl OfflineShaderCompiler for NagaShaderCompiler {
    fn compile(
        &mut self,
        source: &ShaderSource<'_>,
        target: ShaderLanguage,
    ) -> Result<ShaderHandle, ShaderCompileError> {
        if source.language != ShaderLanguage::Wgsl || target != ShaderLanguage::DeviceShader {
            return Err(ShaderCompileError::new(format!(
                "Unsupported translation {:?} -> {:?}",
                source.language, target
            )));
        }

        let compiled = self.compile_module(source.text, source.stage)?;
        tracing::debug!(
            "Validated {:?} shader ({} functions)",
            compiled.stage,
            compiled.module.functions.len()
        );
        Ok(self.registry.register(compiled))
    }
}
