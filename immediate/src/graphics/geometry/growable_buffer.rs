//! Auto-growing GPU buffer
//!
//! Recreated with a power-of-two element capacity whenever a flush needs more
//! room than the current buffer provides. Contents are not preserved across
//! growth: every flush re-uploads the whole used prefix.

use fixfunc_core::{
    BackendError, BufferDescription, BufferHandle, BufferUsage, GraphicsBackend, MemoryHeap,
};

/// Capacity for `required` elements: next power of two, never below `floor`
#[inline]
pub fn grown_capacity(required: usize, floor: usize) -> usize {
    required.next_power_of_two().max(floor)
}

/// Large buffers go to device-local memory, small ones stay host-visible
#[inline]
pub fn memory_heap_for(size_bytes: u64, device_local_threshold: u64) -> MemoryHeap {
    if size_bytes >= device_local_threshold {
        MemoryHeap::DeviceLocal
    } else {
        MemoryHeap::HostToDevice
    }
}

pub struct GrowableBuffer {
    buffer: Option<BufferHandle>,
    usage: BufferUsage,
    /// Element size in bytes
    stride: u32,
    /// Capacity in elements
    capacity: usize,
    min_capacity: usize,
    device_local_threshold: u64,
    label: &'static str,
}

impl GrowableBuffer {
    pub fn new(
        label: &'static str,
        usage: BufferUsage,
        stride: u32,
        min_capacity: usize,
        device_local_threshold: u64,
    ) -> Self {
        Self {
            buffer: None,
            usage,
            stride,
            capacity: 0,
            min_capacity,
            device_local_threshold,
            label,
        }
    }

    /// Make room for `required` elements.
    ///
    /// Returns true if a new backing buffer was created.
    pub fn ensure_capacity<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &B,
        required: usize,
    ) -> Result<bool, BackendError> {
        if self.buffer.is_some() && required <= self.capacity {
            return Ok(false);
        }

        let new_capacity = grown_capacity(required, self.min_capacity);
        let size = new_capacity as u64 * self.stride as u64;
        let heap = memory_heap_for(size, self.device_local_threshold);

        tracing::debug!(
            "Growing buffer '{}': {} -> {} elements ({} bytes, {:?})",
            self.label,
            self.capacity,
            new_capacity,
            size,
            heap
        );

        let buffer = backend.create_buffer(&BufferDescription {
            label: self.label,
            size,
            stride: self.stride,
            usage: self.usage,
            heap,
        })?;

        self.buffer = Some(buffer);
        self.capacity = new_capacity;
        Ok(true)
    }

    /// Upload `data` at the start of the buffer (call `ensure_capacity` first)
    pub fn upload<B: GraphicsBackend + ?Sized>(
        &self,
        backend: &B,
        data: &[u8],
    ) -> Result<(), BackendError> {
        match self.buffer {
            Some(buffer) if !data.is_empty() => backend.upload_buffer(buffer, 0, data),
            _ => Ok(()),
        }
    }

    pub fn buffer(&self) -> Option<BufferHandle> {
        self.buffer
    }

    /// Current capacity in elements
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }
}
