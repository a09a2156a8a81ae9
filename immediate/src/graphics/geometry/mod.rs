//! Immediate vertex and index accumulation
//!
//! Vertices and indices are collected on the CPU during a session and uploaded
//! once, at session end, into growable backend buffers.

mod growable_buffer;

pub use growable_buffer::{GrowableBuffer, grown_capacity, memory_heap_for};

use fixfunc_core::{
    BackendError, BufferHandle, BufferUsage, GraphicsBackend, ImmediateConfig, VertexBindingHandle,
};

use super::vertex::{IMMEDIATE_VERTEX_STRIDE, ImmediateVertex};

const INDEX_SIZE: u32 = std::mem::size_of::<u32>() as u32;

pub struct GeometryAccumulator {
    vertices: Vec<ImmediateVertex>,
    indices: Vec<u32>,
    vertex_buffer: GrowableBuffer,
    index_buffer: GrowableBuffer,
    /// The vertex binding points at the current vertex buffer
    vertex_binding_attached: bool,
}

impl GeometryAccumulator {
    pub fn new(config: &ImmediateConfig) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            vertex_buffer: GrowableBuffer::new(
                "immediate vertices",
                BufferUsage::Vertex,
                IMMEDIATE_VERTEX_STRIDE,
                config.min_geometry_capacity,
                config.device_local_threshold,
            ),
            index_buffer: GrowableBuffer::new(
                "immediate indices",
                BufferUsage::Index,
                INDEX_SIZE,
                config.min_geometry_capacity,
                config.device_local_threshold,
            ),
            vertex_binding_attached: false,
        }
    }

    /// Rewind both arrays; storage and GPU buffers are kept
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn push_vertex(&mut self, vertex: ImmediateVertex) {
        self.vertices.push(vertex);
    }

    pub fn vertices(&self) -> &[ImmediateVertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [ImmediateVertex] {
        &mut self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Index array for appending triangulated or copied indices
    pub fn indices_mut(&mut self) -> &mut Vec<u32> {
        &mut self.indices
    }

    pub fn vertex_buffer(&self) -> Option<BufferHandle> {
        self.vertex_buffer.buffer()
    }

    pub fn index_buffer(&self) -> Option<BufferHandle> {
        self.index_buffer.buffer()
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertex_buffer.capacity()
    }

    pub fn index_capacity(&self) -> usize {
        self.index_buffer.capacity()
    }

    /// Upload the used prefix of both arrays.
    ///
    /// A replaced vertex buffer is re-attached to `vertex_binding`; a failed
    /// attachment is retried on the next flush.
    pub fn flush<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &B,
        vertex_binding: VertexBindingHandle,
    ) -> Result<(), BackendError> {
        if self.vertex_buffer.ensure_capacity(backend, self.vertices.len())? {
            self.vertex_binding_attached = false;
        }
        if !self.vertex_binding_attached
            && let Some(buffer) = self.vertex_buffer.buffer()
        {
            backend.bind_vertex_buffers(vertex_binding, &[buffer])?;
            self.vertex_binding_attached = true;
        }
        self.vertex_buffer
            .upload(backend, bytemuck::cast_slice(&self.vertices))?;

        if !self.indices.is_empty() {
            self.index_buffer.ensure_capacity(backend, self.indices.len())?;
            self.index_buffer
                .upload(backend, bytemuck::cast_slice(&self.indices))?;
        }
        Ok(())
    }
}
