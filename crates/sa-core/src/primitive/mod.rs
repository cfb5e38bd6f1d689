//! Procedural meshes for demo scenes and tests
//!
//! Generates local-space triangle meshes for basic shapes:
//! - Box (rectangular prism)
//! - Plane (subdivided ground quad)
//! - Sphere (UV sphere)

mod box_mesh;
mod plane;
mod sphere;

pub use box_mesh::generate_box_mesh;
pub use plane::generate_plane_mesh;
pub use sphere::{generate_sphere_mesh, generate_sphere_mesh_with_segments};
