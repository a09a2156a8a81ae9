//! Per-session pool of texture resource bindings
//!
//! Slots are handed out in order and the usage counter rewinds every session, so
//! the pool only grows to the largest number of distinct textures any session
//! used. A slot is re-pointed only when its previous texture differs.

use fixfunc_core::{BackendError, BindingHandle, GraphicsBackend, SignatureHandle, TextureHandle};
use hashbrown::HashMap;

use super::BindingBank;

/// Bindings declared for the texture bank: distinct textures per session
pub const MAX_TEXTURE_BINDINGS: u32 = 1000;

#[derive(Debug, Default)]
pub struct TextureBindingAllocator {
    slots: Vec<BindingHandle>,
    /// Texture each slot currently points at
    occupants: Vec<Option<TextureHandle>>,
    used: usize,
    session: HashMap<TextureHandle, BindingHandle>,
}

impl TextureBindingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind the usage counter and forget this session's assignments
    pub fn begin_session(&mut self) {
        self.used = 0;
        self.session.clear();
    }

    /// Binding already assigned to `texture` this session
    pub fn lookup(&self, texture: TextureHandle) -> Option<BindingHandle> {
        self.session.get(&texture).copied()
    }

    /// Binding for `texture`, assigning the next free slot on first use
    pub fn binding_for<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &B,
        signature: SignatureHandle,
        texture: TextureHandle,
    ) -> Result<BindingHandle, BackendError> {
        if let Some(binding) = self.lookup(texture) {
            return Ok(binding);
        }

        let slot = self.used;
        if slot >= MAX_TEXTURE_BINDINGS as usize {
            return Err(BackendError::OutOfMemory("texture binding"));
        }
        if slot == self.slots.len() {
            let binding = backend.create_resource_binding(signature, BindingBank::Texture as u32)?;
            tracing::debug!("Texture binding pool grew to {} slots", slot + 1);
            self.slots.push(binding);
            self.occupants.push(None);
        }

        let binding = self.slots[slot];
        if self.occupants[slot] != Some(texture) {
            backend.bind_sampled_texture(binding, 0, texture)?;
            self.occupants[slot] = Some(texture);
        }

        self.used += 1;
        self.session.insert(texture, binding);
        Ok(binding)
    }

    /// Slots handed out this session
    pub fn used(&self) -> usize {
        self.used
    }

    /// Slots ever created
    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestBackend;

    const SIGNATURE: SignatureHandle = SignatureHandle(1);

    #[test]
    fn test_same_texture_shares_binding() {
        let backend = TestBackend::new();
        let mut pool = TextureBindingAllocator::new();

        let a = pool.binding_for(&backend, SIGNATURE, TextureHandle(10)).unwrap();
        let b = pool.binding_for(&backend, SIGNATURE, TextureHandle(10)).unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.used(), 1);
        assert_eq!(backend.log().texture_binds.len(), 1);
    }

    #[test]
    fn test_distinct_textures_get_distinct_slots() {
        let backend = TestBackend::new();
        let mut pool = TextureBindingAllocator::new();

        let a = pool.binding_for(&backend, SIGNATURE, TextureHandle(1)).unwrap();
        let b = pool.binding_for(&backend, SIGNATURE, TextureHandle(2)).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.pool_size(), 2);
        assert_eq!(backend.log().bindings_in_bank(BindingBank::Texture as u32), 2);
    }

    #[test]
    fn test_slots_reused_across_sessions() {
        let backend = TestBackend::new();
        let mut pool = TextureBindingAllocator::new();
        let first = pool.binding_for(&backend, SIGNATURE, TextureHandle(1)).unwrap();

        pool.begin_session();
        assert_eq!(pool.lookup(TextureHandle(1)), None);

        // Same texture in the same slot: no rebind
        let again = pool.binding_for(&backend, SIGNATURE, TextureHandle(1)).unwrap();
        assert_eq!(first, again);
        assert_eq!(backend.log().texture_binds.len(), 1);

        // Different texture in the reused slot: rebind
        pool.begin_session();
        let other = pool.binding_for(&backend, SIGNATURE, TextureHandle(2)).unwrap();
        assert_eq!(other, first);
        assert_eq!(pool.pool_size(), 1);
        assert_eq!(
            backend.log().texture_binds.last(),
            Some(&(first, TextureHandle(2)))
        );
    }

    #[test]
    fn test_allocation_failure_leaves_pool_unchanged() {
        let backend = TestBackend::new();
        backend.set_fail_allocations(true);
        let mut pool = TextureBindingAllocator::new();

        assert!(pool.binding_for(&backend, SIGNATURE, TextureHandle(3)).is_err());
        assert_eq!(pool.used(), 0);
        assert_eq!(pool.pool_size(), 0);
    }

    #[test]
    fn test_distinct_textures_capped_at_bank_size() {
        let backend = TestBackend::new();
        let mut pool = TextureBindingAllocator::new();

        for raw in 0..MAX_TEXTURE_BINDINGS {
            pool.binding_for(&backend, SIGNATURE, TextureHandle(raw)).unwrap();
        }
        assert_eq!(
            pool.binding_for(&backend, SIGNATURE, TextureHandle(MAX_TEXTURE_BINDINGS)),
            Err(BackendError::OutOfMemory("texture binding"))
        );
        // Textures already bound this session still resolve
        assert!(pool.binding_for(&backend, SIGNATURE, TextureHandle(0)).is_ok());
        assert_eq!(pool.used(), MAX_TEXTURE_BINDINGS as usize);
    }
}
