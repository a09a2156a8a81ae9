//! Immediate vertex format

use bytemuck::{Pod, Zeroable};
use fixfunc_core::{VertexAttribute, VertexFormat};
use std::mem::{offset_of, size_of};

/// One vertex as emitted by `vertex()`: 48 bytes, tightly packed
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ImmediateVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

pub const IMMEDIATE_VERTEX_STRIDE: u32 = size_of::<ImmediateVertex>() as u32;

pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
pub const DEFAULT_TEXCOORD: [f32; 2] = [0.0, 0.0];

impl ImmediateVertex {
    pub fn new(position: [f32; 3], color: [f32; 4], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            color,
            normal,
            texcoord,
        }
    }
}

/// Attribute table of the shared immediate vertex layout (locations 0-3)
pub fn immediate_vertex_attributes() -> [VertexAttribute; 4] {
    [
        VertexAttribute {
            buffer: 0,
            location: 0,
            format: VertexFormat::Float32x3,
            offset: offset_of!(ImmediateVertex, position) as u32,
        },
        VertexAttribute {
            buffer: 0,
            location: 1,
            format: VertexFormat::Float32x4,
            offset: offset_of!(ImmediateVertex, color) as u32,
        },
        VertexAttribute {
            buffer: 0,
            location: 2,
            format: VertexFormat::Float32x3,
            offset: offset_of!(ImmediateVertex, normal) as u32,
        },
        VertexAttribute {
            buffer: 0,
            location: 3,
            format: VertexFormat::Float32x2,
            offset: offset_of!(ImmediateVertex, texcoord) as u32,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(IMMEDIATE_VERTEX_STRIDE, 48);
        let offsets: Vec<u32> = immediate_vertex_attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 28, 40]);
    }
}
