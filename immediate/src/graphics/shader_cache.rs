//! Shader permutation cache
//!
//! Memoizes compiled uber-shader permutations, one table per stage. The cache is
//! shared by every renderer created from the same object cache, so lookups and
//! compilation happen under a lock.

use std::sync::{Mutex, PoisonError};

use fixfunc_core::{
    GraphicsBackend, ShaderCompileError, ShaderHandle, ShaderLanguage, ShaderSource, ShaderStage,
};
use hashbrown::HashMap;

use crate::shader_gen::ShaderCompilationKey;

#[derive(Default)]
struct PermutationTables {
    stages: [HashMap<ShaderCompilationKey, ShaderHandle>; 2],
    compilations: usize,
}

#[derive(Default)]
pub struct ShaderPermutationCache {
    tables: Mutex<PermutationTables>,
}

impl ShaderPermutationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached shader for `key`, compiling it on first request.
    ///
    /// A permutation that fails to compile is a fatal error: the full source and
    /// the compiler log are logged and the process aborts.
    pub fn get_or_compile<B: GraphicsBackend + ?Sized>(
        &self,
        backend: &B,
        key: ShaderCompilationKey,
        stage: ShaderStage,
    ) -> ShaderHandle {
        match self.try_get_or_compile(backend, key, stage) {
            Ok(shader) => shader,
            Err(e) => {
                tracing::error!(
                    "Failed to compile {:?} shader for {:?}\nSource:\n{}\nLog:\n{}",
                    stage,
                    key,
                    key.shader_source(stage),
                    e.log
                );
                std::process::abort();
            }
        }
    }

    /// Like [`Self::get_or_compile`] but returns the compile error
    pub fn try_get_or_compile<B: GraphicsBackend + ?Sized>(
        &self,
        backend: &B,
        key: ShaderCompilationKey,
        stage: ShaderStage,
    ) -> Result<ShaderHandle, ShaderCompileError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&shader) = tables.stages[stage.index()].get(&key) {
            return Ok(shader);
        }

        let text = key.shader_source(stage);
        let mut compiler = backend.create_shader_compiler();
        let shader = compiler.compile(
            &ShaderSource {
                language: ShaderLanguage::Wgsl,
                stage,
                text: &text,
            },
            ShaderLanguage::DeviceShader,
        )?;

        tracing::debug!("Compiled {:?} shader permutation {:?}", stage, key);
        tables.stages[stage.index()].insert(key, shader);
        tables.compilations += 1;
        Ok(shader)
    }

    /// Number of successful compilations so far
    pub fn compilations(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .compilations
    }

    pub fn len(&self, stage: ShaderStage) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stages[stage.index()]
        .len()
    }
}
