//! Graphics backend trait and resource descriptions
//!
//! A backend owns every GPU object. The immediate-mode front end only ever asks it to
//! create, fill and connect resources; draw submission goes through a
//! [`CommandRecorder`](crate::CommandRecorder) instead.

use crate::error::BackendError;
use crate::handles::{
    BindingHandle, BufferHandle, SamplerHandle, SignatureHandle, TextureHandle,
    VertexBindingHandle, VertexLayoutHandle,
};
use crate::shader::OfflineShaderCompiler;

/// Device conventions the front end has to compensate for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Normalized device coordinates put Y = -1 at the top of the viewport
    pub top_left_ndc_origin: bool,
    /// Texture coordinate (0, 0) addresses the bottom-left texel
    pub bottom_left_texture_coordinates: bool,
    /// Required alignment of uniform buffer binding offsets, in bytes
    pub uniform_buffer_offset_alignment: u64,
}

impl DeviceCapabilities {
    /// Projection matrices must flip Y when the two origin conventions disagree
    #[inline]
    pub fn flips_projection_y(&self) -> bool {
        self.top_left_ndc_origin != self.bottom_left_texture_coordinates
    }
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            top_left_ndc_origin: false,
            bottom_left_texture_coordinates: false,
            uniform_buffer_offset_alignment: 256,
        }
    }
}

/// What a buffer will be bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
    Uniform,
}

/// Memory placement of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryHeap {
    /// Fast GPU access, upload goes through a staging copy
    DeviceLocal,
    /// Host-visible, mappable memory written directly by the CPU
    HostToDevice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDescription {
    pub label: &'static str,
    /// Size in bytes
    pub size: u64,
    /// Element stride in bytes (vertex stride, index size, uniform slot size)
    pub stride: u32,
    pub usage: BufferUsage,
    pub heap: MemoryHeap,
}

/// Kind of resource held by every slot of a binding bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Sampler,
    UniformBuffer,
    SampledTexture,
}

/// One bank of a shader signature (maps to a shader-visible group)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingBankDescription {
    pub bank: u32,
    pub kind: BindingKind,
    /// Slots per binding
    pub slot_count: u32,
    /// Upper bound of bindings the front end may create in this bank
    pub max_bindings: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDescription {
    pub min_filter: SamplerFilter,
    pub mag_filter: SamplerFilter,
    pub mipmap_filter: SamplerFilter,
    pub max_anisotropy: u16,
    pub max_lod: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32x4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Index of the vertex buffer this attribute is read from
    pub buffer: u32,
    /// Shader input location
    pub location: u32,
    pub format: VertexFormat,
    /// Byte offset inside one vertex
    pub offset: u32,
}

/// Resource factory consumed by the immediate-mode front end.
///
/// Every method takes `&self`: backends are shared between renderer instances
/// (and threads) and synchronize internally.
pub trait GraphicsBackend: Send + Sync {
    /// Conventions and limits of the underlying device
    fn capabilities(&self) -> DeviceCapabilities;

    fn create_buffer(&self, description: &BufferDescription) -> Result<BufferHandle, BackendError>;

    /// Description a buffer was created with, or `None` for unknown handles
    fn buffer_description(&self, buffer: BufferHandle) -> Option<BufferDescription>;

    /// Copy `data` into `buffer` starting at byte `offset`
    fn upload_buffer(
        &self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), BackendError>;

    fn create_shader_signature(
        &self,
        banks: &[BindingBankDescription],
    ) -> Result<SignatureHandle, BackendError>;

    /// Create a binding for `bank` of `signature`
    fn create_resource_binding(
        &self,
        signature: SignatureHandle,
        bank: u32,
    ) -> Result<BindingHandle, BackendError>;

    /// Point `slot` of `binding` at `size` bytes of `buffer` starting at `offset`
    fn bind_uniform_buffer(
        &self,
        binding: BindingHandle,
        slot: u32,
        buffer: BufferHandle,
        offset: u64,
        size: u64,
    ) -> Result<(), BackendError>;

    fn bind_sampled_texture(
        &self,
        binding: BindingHandle,
        slot: u32,
        texture: TextureHandle,
    ) -> Result<(), BackendError>;

    fn bind_sampler(
        &self,
        binding: BindingHandle,
        slot: u32,
        sampler: SamplerHandle,
    ) -> Result<(), BackendError>;

    fn create_sampler(&self, description: &SamplerDescription)
    -> Result<SamplerHandle, BackendError>;

    /// Create a vertex layout reading from `strides.len()` buffers
    fn create_vertex_layout(
        &self,
        strides: &[u32],
        attributes: &[VertexAttribute],
    ) -> Result<VertexLayoutHandle, BackendError>;

    fn create_vertex_binding(
        &self,
        layout: VertexLayoutHandle,
    ) -> Result<VertexBindingHandle, BackendError>;

    /// Attach `buffers` (one per layout buffer) to a vertex binding
    fn bind_vertex_buffers(
        &self,
        binding: VertexBindingHandle,
        buffers: &[BufferHandle],
    ) -> Result<(), BackendError>;

    /// Fresh offline compiler producing shader objects for this backend
    fn create_shader_compiler(&self) -> Box<dyn OfflineShaderCompiler>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_flip_follows_convention_mismatch() {
        let mut caps = DeviceCapabilities::default();
        assert!(!caps.flips_projection_y());

        caps.top_left_ndc_origin = true;
        assert!(caps.flips_projection_y());

        caps.bottom_left_texture_coordinates = true;
        assert!(!caps.flips_projection_y());
    }
}
