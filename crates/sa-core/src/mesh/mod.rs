//! Triangle meshes and mesh file loading

mod obj;

use glam::Vec3;

use crate::bounds::BoundingBox;
use crate::frame::Frame;

pub use obj::{load_obj, load_obj_from_bytes};

/// Indexed triangle mesh in the local space of its owner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create a mesh, dropping any trailing partial triangle
    pub fn new(vertices: Vec<Vec3>, mut indices: Vec<u32>) -> Self {
        indices.truncate(indices.len() - indices.len() % 3);
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangle corners.
    ///
    /// Triangles referencing a vertex index outside the vertex buffer are
    /// skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.vertices.get(tri[0] as usize)?,
                *self.vertices.get(tri[1] as usize)?,
                *self.vertices.get(tri[2] as usize)?,
            ])
        })
    }

    /// Local-space bounds of the vertex buffer
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().copied())
    }

    /// Vertex positions expressed in world space under `frame`
    pub fn world_vertices<'a>(&'a self, frame: &'a Frame) -> impl Iterator<Item = Vec3> + 'a {
        self.vertices.iter().map(|v| frame.transform_point(*v))
    }
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
}
