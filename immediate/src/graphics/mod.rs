//! Render-state compiler building blocks
//!
//! # Architecture
//!
//! **ImmediateRenderer** (recording) → **DeferredCommandQueue** → **CommandRecorder** (drain)
//!
//! - Matrix stacks and uniform state caches resolve fixed-function state at
//!   primitive boundaries
//! - Geometry accumulates on the CPU and is uploaded once per session
//! - Shader permutations are compiled on demand and shared between renderers

pub(crate) mod command_buffer;
pub(crate) mod geometry;
mod matrix_stack;
mod render_state;
mod shader_cache;
pub(crate) mod texture_bindings;
mod triangulate;
pub(crate) mod uniform_state;
mod vertex;

pub use command_buffer::{DeferredCommandQueue, DrawCall, IndexSource, PendingCommand, VertexSource};
pub use geometry::{GeometryAccumulator, GrowableBuffer, grown_capacity, memory_heap_for};
pub use matrix_stack::{MatrixMode, MatrixStack, MatrixStacks, frustum_matrix, ortho_matrix};
pub use render_state::{FogMode, ImmediateTopology, LightingModel, RenderingState};
pub use shader_cache::ShaderPermutationCache;
pub use texture_bindings::{MAX_TEXTURE_BINDINGS, TextureBindingAllocator};
pub use triangulate::{triangulate_indices, triangulate_range};
pub use uniform_state::{
    ExtraRenderingState, LightState, LightingState, MAX_BONES, MAX_LIGHTS, MaterialState,
    SkinningState, TransformationState, UniformState, UniformStateCache,
};
pub use vertex::{
    DEFAULT_COLOR, DEFAULT_NORMAL, DEFAULT_TEXCOORD, IMMEDIATE_VERTEX_STRIDE, ImmediateVertex,
    immediate_vertex_attributes,
};

/// Shader-visible resource groups of the immediate shader signature.
///
/// Discriminants are the `@group` indices used by the uber-shader.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingBank {
    Sampler = 0,
    Lighting = 1,
    ExtraRendering = 2,
    Material = 3,
    Transformation = 4,
    Skinning = 5,
    Texture = 6,
}

impl BindingBank {
    pub const ALL: [BindingBank; 7] = [
        BindingBank::Sampler,
        BindingBank::Lighting,
        BindingBank::ExtraRendering,
        BindingBank::Material,
        BindingBank::Transformation,
        BindingBank::Skinning,
        BindingBank::Texture,
    ];
}
