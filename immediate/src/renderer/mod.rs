//! Immediate-mode renderer
//!
//! # Architecture
//!
//! `begin_rendering` → record → `end_rendering`
//!
//! - Fixed-function setters mutate the uniform state caches and the rendering state
//! - Every primitive or mesh draw validates the caches and queues a state flush
//!   followed by its draw
//! - `end_rendering` uploads geometry and uniform versions once, then drains the
//!   queue into the recorder with redundant binds removed

mod fixed_function;
mod matrices;
mod mesh;
mod pass_execution;
mod primitives;

pub use fixed_function::{LightDescription, MaterialDescription};

use std::sync::Arc;

use fixfunc_core::{
    BindingHandle, CommandRecorder, GraphicsBackend, SignatureHandle, VertexBindingHandle,
    VertexLayoutHandle,
};

use crate::error::{ImmediateError, Result};
use crate::graphics::{
    DEFAULT_COLOR, DEFAULT_NORMAL, DEFAULT_TEXCOORD, DeferredCommandQueue, ExtraRenderingState,
    GeometryAccumulator, ImmediateTopology, IndexSource, LightingState, MaterialState, MatrixStacks,
    RenderingState, SkinningState, TextureBindingAllocator, TransformationState,
    UniformStateCache, VertexSource,
};
use crate::shared::ImmediateObjectCache;

/// Range opened by `begin_primitives`
#[derive(Debug, Clone, Copy)]
struct OpenPrimitive {
    topology: ImmediateTopology,
    first_vertex: u32,
}

/// Mesh opened by one of the `begin_mesh_*` calls
#[derive(Debug, Clone, Copy)]
struct OpenMesh {
    /// First vertex of the mesh in the immediate vertex array
    base_vertex: u32,
    vertex_count: u32,
    vertex_source: VertexSource,
    /// Caller index buffer bound with `use_index_buffer[_at]`
    index_buffer: Option<IndexSource>,
}

struct Session<R> {
    recorder: R,
    primitive: Option<OpenPrimitive>,
    mesh: Option<OpenMesh>,
}

/// Render-state compiler for one stream of immediate-mode calls.
///
/// Renderers created from the same [`ImmediateObjectCache`] share the shader
/// signature, vertex layout, sampler and compiled shaders. Everything else
/// (geometry, uniform versions, texture bindings) is owned per renderer and
/// reused across sessions.
pub struct ImmediateRenderer<B: GraphicsBackend, R: CommandRecorder> {
    cache: Arc<ImmediateObjectCache<B>>,
    signature: SignatureHandle,
    vertex_layout: VertexLayoutHandle,
    sampler_binding: BindingHandle,
    vertex_binding: VertexBindingHandle,

    matrices: MatrixStacks,
    transformation: UniformStateCache<TransformationState>,
    lighting: UniformStateCache<LightingState>,
    material: UniformStateCache<MaterialState>,
    skinning: UniformStateCache<SkinningState>,
    extra: UniformStateCache<ExtraRenderingState>,

    geometry: GeometryAccumulator,
    textures: TextureBindingAllocator,
    commands: DeferredCommandQueue,

    rendering_state: RenderingState,
    current_color: [f32; 4],
    current_normal: [f32; 3],
    current_texcoord: [f32; 2],

    session: Option<Session<R>>,
}

impl<B: GraphicsBackend, R: CommandRecorder> ImmediateRenderer<B, R> {
    /// Create a renderer, initializing the shared objects on first use
    pub fn new(cache: Arc<ImmediateObjectCache<B>>) -> Result<Self> {
        let shared = cache.ensure_objects()?;
        let (signature, vertex_layout, sampler_binding) =
            (shared.signature, shared.vertex_layout, shared.sampler_binding);

        let backend = cache.backend();
        let capabilities = backend.capabilities();
        let vertex_binding = backend.create_vertex_binding(vertex_layout)?;

        let config = cache.config().clone();
        let alignment = capabilities.uniform_buffer_offset_alignment;

        Ok(Self {
            signature,
            vertex_layout,
            sampler_binding,
            vertex_binding,
            matrices: MatrixStacks::new(capabilities.flips_projection_y()),
            transformation: UniformStateCache::new(alignment, &config),
            lighting: UniformStateCache::new(alignment, &config),
            material: UniformStateCache::new(alignment, &config),
            skinning: UniformStateCache::new(alignment, &config),
            extra: UniformStateCache::new(alignment, &config),
            geometry: GeometryAccumulator::new(&config),
            textures: TextureBindingAllocator::new(),
            commands: DeferredCommandQueue::new(),
            rendering_state: RenderingState::default(),
            current_color: DEFAULT_COLOR,
            current_normal: DEFAULT_NORMAL,
            current_texcoord: DEFAULT_TEXCOORD,
            session: None,
            cache,
        })
    }

    /// Start recording into `recorder`.
    ///
    /// Matrix stacks, uniform state, rendering state, the current vertex
    /// attributes, geometry and the texture binding pool all start from their
    /// defaults.
    pub fn begin_rendering(&mut self, recorder: R) -> Result<()> {
        if self.session.is_some() {
            return Err(ImmediateError::InvalidOperation("already rendering"));
        }

        self.matrices.reset();
        self.transformation.reset();
        self.lighting.reset();
        self.material.reset();
        self.skinning.reset();
        self.extra.reset();
        self.rendering_state = RenderingState::default();
        self.current_color = DEFAULT_COLOR;
        self.current_normal = DEFAULT_NORMAL;
        self.current_texcoord = DEFAULT_TEXCOORD;
        self.geometry.reset();
        self.textures.begin_session();
        self.commands.reset();

        self.session = Some(Session {
            recorder,
            primitive: None,
            mesh: None,
        });
        Ok(())
    }

    /// Upload the session's data, drain every queued command into the recorder and
    /// hand the recorder back.
    ///
    /// A primitive or mesh left open is discarded. On failure the queue is dropped
    /// and the renderer is idle again.
    pub fn end_rendering(&mut self) -> Result<R> {
        let Some(session) = self.session.take() else {
            return Err(ImmediateError::InvalidOperation("not rendering"));
        };
        let mut recorder = session.recorder;

        let result = self
            .flush_rendering_data()
            .and_then(|()| self.drain_commands(&mut recorder));
        self.commands.reset();
        result.map(|()| recorder)
    }

    #[inline]
    pub fn is_rendering(&self) -> bool {
        self.session.is_some()
    }

    /// Shared objects this renderer was created from
    pub fn object_cache(&self) -> &Arc<ImmediateObjectCache<B>> {
        &self.cache
    }

    /// Rendering state the next primitive will be flushed with
    pub fn rendering_state(&self) -> &RenderingState {
        &self.rendering_state
    }

    pub fn matrix_stacks(&self) -> &MatrixStacks {
        &self.matrices
    }

    pub fn transformation_state(&self) -> &UniformStateCache<TransformationState> {
        &self.transformation
    }

    pub fn lighting_state(&self) -> &UniformStateCache<LightingState> {
        &self.lighting
    }

    pub fn material_state(&self) -> &UniformStateCache<MaterialState> {
        &self.material
    }

    pub fn skinning_state(&self) -> &UniformStateCache<SkinningState> {
        &self.skinning
    }

    pub fn extra_rendering_state(&self) -> &UniformStateCache<ExtraRenderingState> {
        &self.extra
    }

    pub fn geometry(&self) -> &GeometryAccumulator {
        &self.geometry
    }

    /// Commands queued so far this session
    pub fn pending_commands(&self) -> &DeferredCommandQueue {
        &self.commands
    }

    fn session(&self) -> Result<&Session<R>> {
        self.session
            .as_ref()
            .ok_or(ImmediateError::InvalidOperation("not rendering"))
    }

    fn session_mut(&mut self) -> Result<&mut Session<R>> {
        self.session
            .as_mut()
            .ok_or(ImmediateError::InvalidOperation("not rendering"))
    }

    /// The open mesh, or an error outside of `begin_mesh_*`/`end_mesh`
    fn open_mesh(&self) -> Result<OpenMesh> {
        self.session()?
            .mesh
            .ok_or(ImmediateError::InvalidOperation("no mesh is open"))
    }

    /// Validate every uniform state cache and queue a flush of the resulting
    /// rendering state, drawn with `topology`.
    fn record_state_flush(&mut self, topology: ImmediateTopology) -> Result<()> {
        self.validate_rendering_states()?;
        self.commands.record_state_flush(RenderingState {
            topology,
            ..self.rendering_state
        });
        Ok(())
    }
}
