//! OBJ mesh file loading

use std::io::{BufRead, Cursor};
use std::path::Path;

use glam::Vec3;

use super::{MeshError, TriangleMesh};

/// Load an OBJ file, scaling every position by `scale`
pub fn load_obj(path: impl AsRef<Path>, scale: f32) -> Result<TriangleMesh, MeshError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| MeshError::Io(format!("{}: {e}", path.display())))?;
    load_obj_from_bytes(&data, scale)
}

/// Load an OBJ from bytes, scaling every position by `scale`
pub fn load_obj_from_bytes(data: &[u8], scale: f32) -> Result<TriangleMesh, MeshError> {
    let mut cursor = Cursor::new(data);
    load_obj_from_reader(&mut cursor, scale)
}

fn load_obj_from_reader(reader: &mut impl BufRead, scale: f32) -> Result<TriangleMesh, MeshError> {
    let (models, _materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .map_err(|e| MeshError::Parse(e.to_string()))?;

    // Combine all models into one mesh
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let vertex_offset = vertices.len() as u32;

        for chunk in mesh.positions.chunks_exact(3) {
            vertices.push(Vec3::new(chunk[0], chunk[1], chunk[2]) * scale);
        }

        indices.extend(mesh.indices.iter().map(|&idx| vertex_offset + idx));
    }

    let mesh = TriangleMesh::new(vertices, indices);
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    tracing::debug!(
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "Loaded OBJ mesh"
    );
    Ok(mesh)
}
