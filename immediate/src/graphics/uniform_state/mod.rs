//! Dirty-tracked uniform state mirrored to the GPU
//!
//! One [`UniformStateCache`] exists per state category. Every validation of a
//! dirty state records a new version for the session; versions are packed into a
//! single uniform buffer at flush time, each behind its own resource binding.
//! Bindings and the buffer persist across sessions and are only recreated when a
//! session needs more versions than ever before.

mod states;

pub use states::{
    ExtraRenderingState, LightState, LightingState, MAX_BONES, MAX_LIGHTS, MaterialState,
    SkinningState, TransformationState,
};

use bytemuck::Pod;
use fixfunc_core::{
    BackendError, BindingHandle, BufferDescription, BufferHandle, BufferUsage, GraphicsBackend,
    ImmediateConfig, SignatureHandle,
};
use std::fmt::Debug;
use std::mem::size_of;

use super::BindingBank;
use super::geometry::{grown_capacity, memory_heap_for};

/// A uniform state category
pub trait UniformState: Pod + PartialEq + Default + Debug + Send + 'static {
    /// Debug label for buffers and logs
    const LABEL: &'static str;
    /// Binding bank the category is bound through
    const BANK: BindingBank;
    /// Bindings declared for the bank, which bounds the versions per session
    const MAX_BINDINGS: u32;
}

pub struct UniformStateCache<T: UniformState> {
    current_state: T,
    dirty: bool,
    /// States validated this session, in version order
    versions: Vec<T>,
    /// Binding `i` always points at version slot `i` of `buffer`
    bindings: Vec<BindingHandle>,
    /// Leading bindings already pointing at the current buffer
    bound_to_buffer: usize,
    last_binding: Option<BindingHandle>,
    buffer: Option<BufferHandle>,
    /// Capacity in versions
    capacity: usize,
    slot_size: u64,
    min_capacity: usize,
    device_local_threshold: u64,
}

impl<T: UniformState> UniformStateCache<T> {
    /// `slot_alignment` is the device uniform-buffer offset alignment
    pub fn new(slot_alignment: u64, config: &ImmediateConfig) -> Self {
        let alignment = slot_alignment.max(1);
        let slot_size = (size_of::<T>() as u64).div_ceil(alignment) * alignment;
        Self {
            current_state: T::default(),
            dirty: true,
            versions: Vec::new(),
            bindings: Vec::new(),
            bound_to_buffer: 0,
            last_binding: None,
            buffer: None,
            capacity: 0,
            slot_size,
            min_capacity: config.min_uniform_versions.max(1),
            device_local_threshold: config.device_local_threshold,
        }
    }

    #[inline]
    pub fn current_state(&self) -> &T {
        &self.current_state
    }

    /// Mutable access for partial updates; follow with [`Self::make_dirty`]
    #[inline]
    pub fn current_state_mut(&mut self) -> &mut T {
        &mut self.current_state
    }

    /// Replace the whole value, always marking dirty
    pub fn set_state(&mut self, state: T) {
        self.current_state = state;
        self.dirty = true;
    }

    /// Apply `update` and mark dirty only if the value actually changed.
    ///
    /// Returns whether it changed.
    pub fn modify(&mut self, update: impl FnOnce(&mut T)) -> bool {
        let before = self.current_state;
        update(&mut self.current_state);
        let changed = self.current_state != before;
        self.dirty |= changed;
        changed
    }

    #[inline]
    pub fn make_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Binding produced by the last validation this session
    pub fn last_binding(&self) -> Option<BindingHandle> {
        self.last_binding
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn buffer(&self) -> Option<BufferHandle> {
        self.buffer
    }

    /// Buffer capacity in versions
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes between consecutive versions in the uniform buffer
    pub fn slot_size(&self) -> u64 {
        self.slot_size
    }

    /// Session start: default value, forced dirty, no versions
    pub fn reset(&mut self) {
        self.current_state = T::default();
        self.dirty = true;
        self.versions.clear();
        self.last_binding = None;
    }

    /// Resolve the binding for the current value.
    ///
    /// A clean cache returns its previous binding. A dirty one records a new version
    /// and hands out the binding of that version slot, creating it on first use.
    pub fn validate<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &B,
        signature: SignatureHandle,
    ) -> Result<BindingHandle, BackendError> {
        if !self.dirty
            && let Some(binding) = self.last_binding
        {
            return Ok(binding);
        }

        let slot = self.versions.len();
        if slot >= T::MAX_BINDINGS as usize {
            return Err(BackendError::OutOfMemory(T::LABEL));
        }
        let binding = match self.bindings.get(slot) {
            Some(&binding) => binding,
            None => {
                let binding = backend.create_resource_binding(signature, T::BANK as u32)?;
                tracing::debug!(
                    "Created {} binding {} (slot {})",
                    T::LABEL,
                    binding.raw(),
                    slot
                );
                self.bindings.push(binding);
                binding
            }
        };

        self.versions.push(self.current_state);
        self.dirty = false;
        self.last_binding = Some(binding);
        Ok(binding)
    }

    /// Upload every version recorded this session.
    ///
    /// Grows the buffer when the session needs more slots than it holds; bindings
    /// are re-pointed only when they are new or the buffer was replaced.
    pub fn flush<B: GraphicsBackend + ?Sized>(&mut self, backend: &B) -> Result<(), BackendError> {
        if self.versions.is_empty() {
            return Ok(());
        }

        let buffer = match self.buffer {
            Some(buffer) if self.versions.len() <= self.capacity => buffer,
            _ => {
                let capacity = grown_capacity(self.versions.len(), self.min_capacity);
                let size = capacity as u64 * self.slot_size;
                let buffer = backend.create_buffer(&BufferDescription {
                    label: T::LABEL,
                    size,
                    stride: self.slot_size as u32,
                    usage: BufferUsage::Uniform,
                    heap: memory_heap_for(size, self.device_local_threshold),
                })?;
                tracing::debug!(
                    "Growing {} buffer: {} -> {} versions ({} bytes)",
                    T::LABEL,
                    self.capacity,
                    capacity,
                    size
                );
                self.buffer = Some(buffer);
                self.capacity = capacity;
                self.bound_to_buffer = 0;
                buffer
            }
        };

        let used = self.versions.len();
        for slot in self.bound_to_buffer..used {
            backend.bind_uniform_buffer(
                self.bindings[slot],
                0,
                buffer,
                slot as u64 * self.slot_size,
                size_of::<T>() as u64,
            )?;
        }
        self.bound_to_buffer = self.bound_to_buffer.max(used);

        let mut bytes = vec![0u8; used * self.slot_size as usize];
        for (slot, version) in self.versions.iter().enumerate() {
            let start = slot * self.slot_size as usize;
            bytes[start..start + size_of::<T>()].copy_from_slice(bytemuck::bytes_of(version));
        }
        backend.upload_buffer(buffer, 0, &bytes)
    }
}
