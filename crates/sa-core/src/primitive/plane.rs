//! Ground plane mesh generation

use glam::Vec3;

use crate::mesh::TriangleMesh;

/// Generate a square plane in the XZ plane, centered on the origin
///
/// # Arguments
/// * `size` - Edge length
/// * `subdivisions` - Cells per edge (at least 1)
pub fn generate_plane_mesh(size: f32, subdivisions: u32) -> TriangleMesh {
    let cells = subdivisions.max(1);
    let row = cells + 1;
    let half = size * 0.5;
    let step = size / cells as f32;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    for iz in 0..row {
        for ix in 0..row {
            vertices.push(Vec3::new(
                -half + ix as f32 * step,
                0.0,
                -half + iz as f32 * step,
            ));
        }
    }

    let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
    for iz in 0..cells {
        for ix in 0..cells {
            let current = iz * row + ix;
            let next = current + row;

            // Wound so the face normal is +Y
            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    TriangleMesh::new(vertices, indices)
}
