//! Render state enums and the per-primitive rendering state snapshot

use fixfunc_core::{BindingHandle, PrimitiveTopology, TextureHandle};

/// Lighting evaluation model selected when lighting is enabled
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightingModel {
    /// Lighting evaluated per vertex, color interpolated
    #[default]
    PerVertex = 0,
    /// Lighting evaluated per fragment
    PerFragment = 1,
    /// Metallic-roughness shading per fragment
    MetallicRoughness = 2,
}

impl LightingModel {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::PerVertex),
            1 => Some(Self::PerFragment),
            2 => Some(Self::MetallicRoughness),
            _ => None,
        }
    }
}

/// Fog equation; discriminants match the uber-shader `fog_mode` switch
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FogMode {
    #[default]
    None = 0,
    Linear = 1,
    Exponential = 2,
    ExponentialSquared = 3,
}

impl FogMode {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Linear),
            2 => Some(Self::Exponential),
            3 => Some(Self::ExponentialSquared),
            _ => None,
        }
    }
}

/// Topology accepted by `begin_primitives`.
///
/// Fans, polygons and quads are synthetic: they are triangulated on the CPU and
/// drawn as an indexed triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImmediateTopology {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    LinesWithAdjacency,
    LineStripWithAdjacency,
    TrianglesWithAdjacency,
    TriangleStripWithAdjacency,
    Patches,
    TriangleFan,
    Polygon,
    Quads,
}

impl ImmediateTopology {
    #[inline]
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::TriangleFan | Self::Polygon | Self::Quads)
    }

    /// Topology the backend actually draws
    pub fn native(self) -> PrimitiveTopology {
        match self {
            Self::Points => PrimitiveTopology::Points,
            Self::Lines => PrimitiveTopology::Lines,
            Self::LineStrip => PrimitiveTopology::LineStrip,
            Self::Triangles | Self::TriangleFan | Self::Polygon | Self::Quads => {
                PrimitiveTopology::Triangles
            }
            Self::TriangleStrip => PrimitiveTopology::TriangleStrip,
            Self::LinesWithAdjacency => PrimitiveTopology::LinesWithAdjacency,
            Self::LineStripWithAdjacency => PrimitiveTopology::LineStripWithAdjacency,
            Self::TrianglesWithAdjacency => PrimitiveTopology::TrianglesWithAdjacency,
            Self::TriangleStripWithAdjacency => PrimitiveTopology::TriangleStripWithAdjacency,
            Self::Patches => PrimitiveTopology::Patches,
        }
    }
}

impl From<PrimitiveTopology> for ImmediateTopology {
    fn from(topology: PrimitiveTopology) -> Self {
        match topology {
            PrimitiveTopology::Points => Self::Points,
            PrimitiveTopology::Lines => Self::Lines,
            PrimitiveTopology::LineStrip => Self::LineStrip,
            PrimitiveTopology::Triangles => Self::Triangles,
            PrimitiveTopology::TriangleStrip => Self::TriangleStrip,
            PrimitiveTopology::LinesWithAdjacency => Self::LinesWithAdjacency,
            PrimitiveTopology::LineStripWithAdjacency => Self::LineStripWithAdjacency,
            PrimitiveTopology::TrianglesWithAdjacency => Self::TrianglesWithAdjacency,
            PrimitiveTopology::TriangleStripWithAdjacency => Self::TriangleStripWithAdjacency,
            PrimitiveTopology::Patches => Self::Patches,
        }
    }
}

/// Resolved state captured at each primitive boundary.
///
/// Compared field by field while draining so only changed bindings are re-issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderingState {
    pub flat_shading: bool,
    pub texturing_enabled: bool,
    pub active_texture: Option<TextureHandle>,
    pub skinning_enabled: bool,
    pub lighting_enabled: bool,
    pub lighting_model: LightingModel,
    pub topology: ImmediateTopology,

    pub transformation_binding: Option<BindingHandle>,
    pub lighting_binding: Option<BindingHandle>,
    pub material_binding: Option<BindingHandle>,
    pub skinning_binding: Option<BindingHandle>,
    pub extra_binding: Option<BindingHandle>,
}

impl RenderingState {
    /// Uniform bindings in bank order
    pub fn uniform_bindings(&self) -> [Option<BindingHandle>; 5] {
        [
            self.lighting_binding,
            self.extra_binding,
            self.material_binding,
            self.transformation_binding,
            self.skinning_binding,
        ]
    }
}
