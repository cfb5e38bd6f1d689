//! Render buffer vertex layouts
//!
//! Hosts upload these with `bytemuck::cast_slice` straight into vertex
//! buffers.

use bytemuck::{Pod, Zeroable};

/// Vertex for the filled arc fan
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ArcVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Vertex for line strips (trace lines, arc outline)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(std::mem::size_of::<ArcVertex>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
    }

    #[test]
    fn test_cast_to_bytes() {
        let verts = [ArcVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.5, 0.5],
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 32);
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[4], 1.0);
    }
}
