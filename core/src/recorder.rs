//! Command recorder trait and pass-through fixed-function state

use crate::handles::{
    BindingHandle, BufferHandle, ShaderHandle, SignatureHandle, VertexBindingHandle,
    VertexLayoutHandle,
};

/// Primitive topologies a backend can draw natively
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    Points = 0,
    Lines = 1,
    LineStrip = 2,
    #[default]
    Triangles = 3,
    TriangleStrip = 4,
    LinesWithAdjacency = 5,
    LineStripWithAdjacency = 6,
    TrianglesWithAdjacency = 7,
    TriangleStripWithAdjacency = 8,
    Patches = 9,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero = 0,
    One = 1,
    SourceColor = 2,
    InverseSourceColor = 3,
    SourceAlpha = 4,
    InverseSourceAlpha = 5,
    DestinationColor = 6,
    InverseDestinationColor = 7,
    DestinationAlpha = 8,
    InverseDestinationAlpha = 9,
    ConstantFactor = 10,
    InverseConstantFactor = 11,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOperation {
    Add = 0,
    Subtract = 1,
    ReverseSubtract = 2,
    Min = 3,
    Max = 4,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never = 0,
    Less = 1,
    Equal = 2,
    LessEqual = 3,
    Greater = 4,
    NotEqual = 5,
    GreaterEqual = 6,
    Always = 7,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOperation {
    Keep = 0,
    Zero = 1,
    Replace = 2,
    Invert = 3,
    IncrementClamp = 4,
    DecrementClamp = 5,
    IncrementWrap = 6,
    DecrementWrap = 7,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None = 0,
    Front = 1,
    Back = 2,
    FrontAndBack = 3,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceWinding {
    CounterClockwise = 0,
    Clockwise = 1,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill = 0,
    Line = 1,
    Point = 2,
}

/// Color channel write mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMask {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alpha: bool,
}

impl ColorMask {
    pub const ALL: Self = Self {
        red: true,
        green: true,
        blue: true,
        alpha: true,
    };
}

/// Fixed-function pipeline state forwarded verbatim to the recorder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedFunctionState {
    BlendState {
        enabled: bool,
    },
    BlendFunction {
        source_factor: BlendFactor,
        destination_factor: BlendFactor,
        color_operation: BlendOperation,
        source_alpha_factor: BlendFactor,
        destination_alpha_factor: BlendFactor,
        alpha_operation: BlendOperation,
    },
    ColorMask(ColorMask),
    FrontFace(FaceWinding),
    CullMode(CullMode),
    DepthBias {
        constant_factor: f32,
        clamp: f32,
        slope_factor: f32,
    },
    DepthState {
        test_enabled: bool,
        write_enabled: bool,
        function: CompareFunction,
    },
    PolygonMode(PolygonMode),
    StencilState {
        enabled: bool,
    },
    StencilFrontFace {
        fail: StencilOperation,
        depth_fail: StencilOperation,
        pass: StencilOperation,
        function: CompareFunction,
    },
    StencilBackFace {
        fail: StencilOperation,
        depth_fail: StencilOperation,
        pass: StencilOperation,
        function: CompareFunction,
    },
    Viewport {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Scissor {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    StencilReference(u32),
}

/// Explicit command stream produced when a session is drained.
///
/// Calls arrive in program order and are already de-duplicated: a binding is only
/// re-issued when it differs from the last one sent.
pub trait CommandRecorder {
    fn set_shader_signature(&mut self, signature: SignatureHandle);
    fn set_vertex_stage(&mut self, shader: ShaderHandle, entry_point: &str);
    fn set_fragment_stage(&mut self, shader: ShaderHandle, entry_point: &str);
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);
    fn set_vertex_layout(&mut self, layout: VertexLayoutHandle);
    fn use_vertex_binding(&mut self, binding: VertexBindingHandle);

    /// Bind an index buffer with `index_size`-byte indices starting at byte `offset`
    fn use_index_buffer_at(&mut self, buffer: BufferHandle, offset: u64, index_size: u32);

    fn use_shader_resources(&mut self, binding: BindingHandle);

    fn draw_arrays(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        base_instance: u32,
    );

    fn draw_elements(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        base_instance: u32,
    );

    fn apply_fixed_function(&mut self, state: &FixedFunctionState);
}
