//! Objects shared by every immediate renderer on one backend
//!
//! The shader signature, vertex layout, linear sampler and shader permutation
//! cache are created lazily by the first renderer that needs them and reused by
//! all later ones.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use fixfunc_core::{
    BackendError, BindingBankDescription, BindingHandle, BindingKind, GraphicsBackend,
    ImmediateConfig, SamplerDescription, SamplerFilter, SamplerHandle, SignatureHandle,
    VertexLayoutHandle,
};

use crate::graphics::{
    BindingBank, ExtraRenderingState, IMMEDIATE_VERTEX_STRIDE, LightingState, MAX_TEXTURE_BINDINGS,
    MaterialState, ShaderPermutationCache, SkinningState, TransformationState, UniformState,
    immediate_vertex_attributes,
};

pub struct SharedImmediateObjects {
    pub signature: SignatureHandle,
    pub vertex_layout: VertexLayoutHandle,
    pub linear_sampler: SamplerHandle,
    /// Sampler bank binding holding `linear_sampler`
    pub sampler_binding: BindingHandle,
    pub shader_library: ShaderPermutationCache,
}

impl SharedImmediateObjects {
    fn create<B: GraphicsBackend + ?Sized>(
        backend: &B,
        config: &ImmediateConfig,
    ) -> Result<Self, BackendError> {
        let banks = BindingBank::ALL.map(|bank| {
            let (kind, max_bindings) = match bank {
                BindingBank::Sampler => (BindingKind::Sampler, 1),
                BindingBank::Lighting => (BindingKind::UniformBuffer, LightingState::MAX_BINDINGS),
                BindingBank::ExtraRendering => {
                    (BindingKind::UniformBuffer, ExtraRenderingState::MAX_BINDINGS)
                }
                BindingBank::Material => (BindingKind::UniformBuffer, MaterialState::MAX_BINDINGS),
                BindingBank::Transformation => {
                    (BindingKind::UniformBuffer, TransformationState::MAX_BINDINGS)
                }
                BindingBank::Skinning => (BindingKind::UniformBuffer, SkinningState::MAX_BINDINGS),
                BindingBank::Texture => (BindingKind::SampledTexture, MAX_TEXTURE_BINDINGS),
            };
            BindingBankDescription {
                bank: bank as u32,
                kind,
                slot_count: 1,
                max_bindings,
            }
        });
        let signature = backend.create_shader_signature(&banks)?;

        let linear_sampler = backend.create_sampler(&SamplerDescription {
            min_filter: SamplerFilter::Linear,
            mag_filter: SamplerFilter::Linear,
            mipmap_filter: SamplerFilter::Linear,
            max_anisotropy: config.max_anisotropy,
            max_lod: config.max_lod,
        })?;
        let sampler_binding =
            backend.create_resource_binding(signature, BindingBank::Sampler as u32)?;
        backend.bind_sampler(sampler_binding, 0, linear_sampler)?;

        let vertex_layout =
            backend.create_vertex_layout(&[IMMEDIATE_VERTEX_STRIDE], &immediate_vertex_attributes())?;

        tracing::debug!(
            "Created shared immediate objects (signature {}, layout {})",
            signature.raw(),
            vertex_layout.raw()
        );

        Ok(Self {
            signature,
            vertex_layout,
            linear_sampler,
            sampler_binding,
            shader_library: ShaderPermutationCache::new(),
        })
    }
}

/// Backend plus the lazily created [`SharedImmediateObjects`]
pub struct ImmediateObjectCache<B: GraphicsBackend> {
    backend: Arc<B>,
    config: ImmediateConfig,
    objects: OnceLock<SharedImmediateObjects>,
    init_lock: Mutex<()>,
}

impl<B: GraphicsBackend> ImmediateObjectCache<B> {
    pub fn new(backend: Arc<B>, config: ImmediateConfig) -> Arc<Self> {
        Arc::new(Self {
            backend,
            config,
            objects: OnceLock::new(),
            init_lock: Mutex::new(()),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ImmediateConfig {
        &self.config
    }

    /// Shared objects, created on first call.
    ///
    /// A failed creation leaves the cache empty so a later call can retry.
    pub fn ensure_objects(&self) -> Result<&SharedImmediateObjects, BackendError> {
        if let Some(objects) = self.objects.get() {
            return Ok(objects);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(objects) = self.objects.get() {
            return Ok(objects);
        }

        let objects = SharedImmediateObjects::create(&*self.backend, &self.config)?;
        Ok(self.objects.get_or_init(|| objects))
    }

    /// Shared objects if they have been created
    pub fn objects(&self) -> Option<&SharedImmediateObjects> {
        self.objects.get()
    }
}
