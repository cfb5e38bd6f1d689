//! Box (rectangular prism) mesh generation

use glam::Vec3;

use crate::mesh::TriangleMesh;

/// Generate a box mesh centered on the origin
///
/// Corners are shared between faces so every vertex is a distinct
/// pickable site: 8 vertices, 12 triangles.
pub fn generate_box_mesh(size: Vec3) -> TriangleMesh {
    let h = size * 0.5;

    // Corner i has +x when bit 0 is set, +y for bit 1, +z for bit 2
    let vertices = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 != 0 { h.x } else { -h.x },
                if i & 2 != 0 { h.y } else { -h.y },
                if i & 4 != 0 { h.z } else { -h.z },
            )
        })
        .collect();

    // Counter-clockwise when viewed from outside
    let indices = vec![
        1, 3, 7, 1, 7, 5, // +X
        0, 4, 6, 0, 6, 2, // -X
        2, 6, 7, 2, 7, 3, // +Y
        0, 1, 5, 0, 5, 4, // -Y
        4, 5, 7, 4, 7, 6, // +Z
        0, 2, 3, 0, 3, 1, // -Z
    ];

    TriangleMesh::new(vertices, indices)
}
