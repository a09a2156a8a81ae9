//! Shared test utilities for unit tests

use hashbrown::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fixfunc_core::{
    BackendError, BindingBankDescription, BindingHandle, BufferDescription, BufferHandle,
    CommandRecorder, DeviceCapabilities, FixedFunctionState, GraphicsBackend,
    OfflineShaderCompiler, PrimitiveTopology, SamplerDescription, SamplerHandle,
    ShaderCompileError, ShaderHandle, ShaderLanguage, ShaderSource, SignatureHandle,
    TextureHandle, VertexAttribute, VertexBindingHandle, VertexLayoutHandle,
};

/// Route `tracing` output through the test harness; `RUST_LOG` selects the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Test Backend
// ============================================================================

/// Everything the test backend has been asked to do
#[derive(Debug, Default)]
pub struct BackendLog {
    next_id: u32,
    pub buffers: HashMap<BufferHandle, BufferDescription>,
    /// Latest contents written to each buffer
    pub contents: HashMap<BufferHandle, Vec<u8>>,
    pub uploads: usize,
    /// (binding, bank) for every created resource binding
    pub resource_bindings: Vec<(BindingHandle, u32)>,
    /// (binding, buffer, offset, size)
    pub uniform_binds: Vec<(BindingHandle, BufferHandle, u64, u64)>,
    pub texture_binds: Vec<(BindingHandle, TextureHandle)>,
    pub sampler_binds: Vec<(BindingHandle, SamplerHandle)>,
    pub vertex_buffer_binds: Vec<(VertexBindingHandle, Vec<BufferHandle>)>,
    pub signatures: Vec<Vec<BindingBankDescription>>,
    pub vertex_layouts: Vec<(Vec<u32>, Vec<VertexAttribute>)>,
    pub samplers: usize,
    pub vertex_bindings: usize,
}

impl BackendLog {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn bindings_in_bank(&self, bank: u32) -> usize {
        self.resource_bindings.iter().filter(|(_, b)| *b == bank).count()
    }
}

/// Recording backend double with optional allocation failure
pub struct TestBackend {
    pub log: Mutex<BackendLog>,
    pub capabilities: DeviceCapabilities,
    pub fail_allocations: std::sync::atomic::AtomicBool,
    /// Fail the next `bind_vertex_buffers` call only
    pub fail_next_vertex_bind: std::sync::atomic::AtomicBool,
    pub compiler: TestCompilerShared,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities::default())
    }

    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self {
            log: Mutex::new(BackendLog::default()),
            capabilities,
            fail_allocations: std::sync::atomic::AtomicBool::new(false),
            fail_next_vertex_bind: std::sync::atomic::AtomicBool::new(false),
            compiler: TestCompilerShared::default(),
        }
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, BackendLog> {
        self.log.lock().unwrap()
    }

    pub fn set_fail_allocations(&self, fail: bool) {
        self.fail_allocations.store(fail, Ordering::SeqCst);
    }

    pub fn fail_next_vertex_bind(&self) {
        self.fail_next_vertex_bind.store(true, Ordering::SeqCst);
    }

    fn allocate(&self, what: &'static str) -> Result<u32, BackendError> {
        if self.fail_allocations.load(Ordering::SeqCst) {
            return Err(BackendError::OutOfMemory(what));
        }
        Ok(self.log().next())
    }

    /// Latest contents of `buffer` reinterpreted as `T`
    pub fn contents_as<T: bytemuck::Pod>(&self, buffer: BufferHandle) -> Vec<T> {
        let log = self.log();
        let bytes = log.contents.get(&buffer).cloned().unwrap_or_default();
        bytes
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }
}

impl GraphicsBackend for TestBackend {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn create_buffer(&self, description: &BufferDescription) -> Result<BufferHandle, BackendError> {
        let buffer = BufferHandle(self.allocate("buffer")?);
        self.log().buffers.insert(buffer, description.clone());
        Ok(buffer)
    }

    fn buffer_description(&self, buffer: BufferHandle) -> Option<BufferDescription> {
        self.log().buffers.get(&buffer).cloned()
    }

    fn upload_buffer(&self, buffer: BufferHandle, offset: u64, data: &[u8]) -> Result<(), BackendError> {
        let mut log = self.log();
        let size = match log.buffers.get(&buffer) {
            Some(description) => description.size,
            None => {
                return Err(BackendError::InvalidHandle {
                    kind: "buffer",
                    raw: buffer.raw(),
                });
            }
        };
        assert!(offset + data.len() as u64 <= size, "upload past end of buffer");
        let contents = log.contents.entry(buffer).or_default();
        let end = offset as usize + data.len();
        if contents.len() < end {
            contents.resize(end, 0);
        }
        contents[offset as usize..end].copy_from_slice(data);
        log.uploads += 1;
        Ok(())
    }

    fn create_shader_signature(
        &self,
        banks: &[BindingBankDescription],
    ) -> Result<SignatureHandle, BackendError> {
        let signature = SignatureHandle(self.allocate("shader signature")?);
        self.log().signatures.push(banks.to_vec());
        Ok(signature)
    }

    fn create_resource_binding(
        &self,
        _signature: SignatureHandle,
        bank: u32,
    ) -> Result<BindingHandle, BackendError> {
        let binding = BindingHandle(self.allocate("resource binding")?);
        self.log().resource_bindings.push((binding, bank));
        Ok(binding)
    }

    fn bind_uniform_buffer(
        &self,
        binding: BindingHandle,
        _slot: u32,
        buffer: BufferHandle,
        offset: u64,
        size: u64,
    ) -> Result<(), BackendError> {
        self.log().uniform_binds.push((binding, buffer, offset, size));
        Ok(())
    }

    fn bind_sampled_texture(
        &self,
        binding: BindingHandle,
        _slot: u32,
        texture: TextureHandle,
    ) -> Result<(), BackendError> {
        self.log().texture_binds.push((binding, texture));
        Ok(())
    }

    fn bind_sampler(
        &self,
        binding: BindingHandle,
        _slot: u32,
        sampler: SamplerHandle,
    ) -> Result<(), BackendError> {
        self.log().sampler_binds.push((binding, sampler));
        Ok(())
    }

    fn create_sampler(&self, _description: &SamplerDescription) -> Result<SamplerHandle, BackendError> {
        let sampler = SamplerHandle(self.allocate("sampler")?);
        self.log().samplers += 1;
        Ok(sampler)
    }

    fn create_vertex_layout(
        &self,
        strides: &[u32],
        attributes: &[VertexAttribute],
    ) -> Result<VertexLayoutHandle, BackendError> {
        let layout = VertexLayoutHandle(self.allocate("vertex layout")?);
        self.log()
            .vertex_layouts
            .push((strides.to_vec(), attributes.to_vec()));
        Ok(layout)
    }

    fn create_vertex_binding(
        &self,
        _layout: VertexLayoutHandle,
    ) -> Result<VertexBindingHandle, BackendError> {
        let binding = VertexBindingHandle(self.allocate("vertex binding")?);
        self.log().vertex_bindings += 1;
        Ok(binding)
    }

    fn bind_vertex_buffers(
        &self,
        binding: VertexBindingHandle,
        buffers: &[BufferHandle],
    ) -> Result<(), BackendError> {
        if self.fail_next_vertex_bind.swap(false, Ordering::SeqCst) {
            return Err(BackendError::OutOfMemory("vertex binding"));
        }
        self.log().vertex_buffer_binds.push((binding, buffers.to_vec()));
        Ok(())
    }

    fn create_shader_compiler(&self) -> Box<dyn OfflineShaderCompiler> {
        Box::new(TestCompiler {
            shared: self.compiler.clone(),
        })
    }
}

// ============================================================================
// Test Shader Compiler
// ============================================================================

/// State shared by every compiler the test backend hands out
#[derive(Clone, Default)]
pub struct TestCompilerShared {
    pub compilations: Arc<AtomicUsize>,
    pub sources: Arc<Mutex<Vec<String>>>,
    /// Fail any source containing this text
    pub fail_on: Arc<Mutex<Option<String>>>,
}

impl TestCompilerShared {
    pub fn count(&self) -> usize {
        self.compilations.load(Ordering::SeqCst)
    }
}

/// Counts compilations and hands out sequential shader handles
pub struct TestCompiler {
    shared: TestCompilerShared,
}

impl OfflineShaderCompiler for TestCompiler {
    fn compile(
        &mut self,
        source: &ShaderSource<'_>,
        target: ShaderLanguage,
    ) -> Result<ShaderHandle, ShaderCompileError> {
        assert_eq!(source.language, ShaderLanguage::Wgsl);
        assert_eq!(target, ShaderLanguage::DeviceShader);
        if let Some(needle) = self.shared.fail_on.lock().unwrap().as_deref()
            && source.text.contains(needle)
        {
            return Err(ShaderCompileError::new(format!("rejected: {needle}")));
        }
        self.shared.sources.lock().unwrap().push(source.text.to_string());
        let id = self.shared.compilations.fetch_add(1, Ordering::SeqCst) as u32;
        Ok(ShaderHandle(id + 1))
    }
}

// ============================================================================
// Test Command Recorder
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    SetShaderSignature(SignatureHandle),
    SetVertexStage(ShaderHandle),
    SetFragmentStage(ShaderHandle),
    SetPrimitiveTopology(PrimitiveTopology),
    SetVertexLayout(VertexLayoutHandle),
    UseVertexBinding(VertexBindingHandle),
    UseIndexBuffer {
        buffer: BufferHandle,
        offset: u64,
        index_size: u32,
    },
    UseShaderResources(BindingHandle),
    DrawArrays {
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        base_instance: u32,
    },
    DrawElements {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        base_instance: u32,
    },
    FixedFunction(FixedFunctionState),
}

impl RecordedCall {
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawArrays { .. } | Self::DrawElements { .. })
    }
}

#[derive(Debug, Default)]
pub struct TestRecorder {
    pub calls: Vec<RecordedCall>,
}

impl TestRecorder {
    pub fn draws(&self) -> Vec<&RecordedCall> {
        self.calls.iter().filter(|call| call.is_draw()).collect()
    }

    pub fn count(&self, predicate: impl Fn(&RecordedCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn resource_binds(&self) -> Vec<BindingHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::UseShaderResources(binding) => Some(*binding),
                _ => None,
            })
            .collect()
    }
}

impl CommandRecorder for TestRecorder {
    fn set_shader_signature(&mut self, signature: SignatureHandle) {
        self.calls.push(RecordedCall::SetShaderSignature(signature));
    }

    fn set_vertex_stage(&mut self, shader: ShaderHandle, _entry_point: &str) {
        self.calls.push(RecordedCall::SetVertexStage(shader));
    }

    fn set_fragment_stage(&mut self, shader: ShaderHandle, _entry_point: &str) {
        self.calls.push(RecordedCall::SetFragmentStage(shader));
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.calls.push(RecordedCall::SetPrimitiveTopology(topology));
    }

    fn set_vertex_layout(&mut self, layout: VertexLayoutHandle) {
        self.calls.push(RecordedCall::SetVertexLayout(layout));
    }

    fn use_vertex_binding(&mut self, binding: VertexBindingHandle) {
        self.calls.push(RecordedCall::UseVertexBinding(binding));
    }

    fn use_index_buffer_at(&mut self, buffer: BufferHandle, offset: u64, index_size: u32) {
        self.calls.push(RecordedCall::UseIndexBuffer {
            buffer,
            offset,
            index_size,
        });
    }

    fn use_shader_resources(&mut self, binding: BindingHandle) {
        self.calls.push(RecordedCall::UseShaderResources(binding));
    }

    fn draw_arrays(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, base_instance: u32) {
        self.calls.push(RecordedCall::DrawArrays {
            vertex_count,
            instance_count,
            first_vertex,
            base_instance,
        });
    }

    fn draw_elements(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        base_instance: u32,
    ) {
        self.calls.push(RecordedCall::DrawElements {
            index_count,
            instance_count,
            first_index,
            base_vertex,
            base_instance,
        });
    }

    fn apply_fixed_function(&mut self, state: &FixedFunctionState) {
        self.calls.push(RecordedCall::FixedFunction(*state));
    }
}
