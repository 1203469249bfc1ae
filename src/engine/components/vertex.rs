use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

/// Which field of a [`Vertex`] an attribute reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Normal,
    TexCoord,
}

/// Layout of one float attribute inside a [`Vertex`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub kind: AttributeKind,
    pub components: i32,
    pub offset: usize,
}

/// A single vertex record as it is laid out in device memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    /// Size of one record in bytes; the stride of every attribute.
    pub const STRIDE: usize = size_of::<Vertex>();

    /// Attribute layouts in binding order.
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            kind: AttributeKind::Position,
            components: 3,
            offset: offset_of!(Vertex, position),
        },
        VertexAttribute {
            kind: AttributeKind::Normal,
            components: 3,
            offset: offset_of!(Vertex, normal),
        },
        VertexAttribute {
            kind: AttributeKind::TexCoord,
            components: 2,
            offset: offset_of!(Vertex, texcoord),
        },
    ];

    pub const fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}
