//! Sphere mesh generation (UV sphere)

use std::f32::consts::PI;

use glam::Vec3;

use crate::mesh::TriangleMesh;

/// Generate a UV sphere mesh with poles on the Y axis
pub fn generate_sphere_mesh(radius: f32) -> TriangleMesh {
    use crate::constants::{SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS};
    generate_sphere_mesh_with_segments(radius, SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS)
}

/// Generate a UV sphere mesh with custom resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `lat_segments` - Number of latitude bands (default: 16)
/// * `lon_segments` - Number of longitude segments (default: 32)
pub fn generate_sphere_mesh_with_segments(
    radius: f32,
    lat_segments: u32,
    lon_segments: u32,
) -> TriangleMesh {
    let lat_segments = lat_segments.max(2);
    let lon_segments = lon_segments.max(3);

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=lat_segments {
        let theta = (lat as f32 / lat_segments as f32) * PI; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=lon_segments {
            let phi = (lon as f32 / lon_segments as f32) * 2.0 * PI; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            vertices.push(Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi) * radius);
        }
    }

    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let current = lat * (lon_segments + 1) + lon;
            let next = current + lon_segments + 1;

            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    TriangleMesh::new(vertices, indices)
}
