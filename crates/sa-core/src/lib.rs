//! Surface Angle Core
//!
//! Geometry kernel for measuring the angle formed by three points picked on
//! arbitrary surfaces.
//!
//! # Module Structure
//!
//! ```text
//! sa-core/
//! ├── ray.rs        # Rays, planes and intersection tests
//! ├── bounds.rs     # Axis-aligned bounding boxes
//! ├── frame.rs      # Rigid reference frames (scene node transforms)
//! ├── camera.rs     # Viewpoint and pointer-to-world rays
//! ├── mesh/         # Triangle meshes and OBJ loading
//! ├── primitive/    # Procedural box, sphere and plane meshes
//! ├── surface/      # SurfaceQuery trait and the MeshScene backend
//! ├── trace.rs      # Surface-hugging polylines
//! ├── angle.rs      # Plane-projected angle basis
//! ├── arc.rs        # Arc fan / outline meshes and label placement
//! └── vertex.rs     # Render buffer vertex layouts
//! ```

pub mod angle;
pub mod arc;
pub mod bounds;
pub mod camera;
pub mod constants;
pub mod frame;
pub mod mesh;
pub mod primitive;
pub mod ray;
pub mod surface;
pub mod trace;
pub mod vertex;

// Re-exports for convenience
pub use angle::{AngleBasis, Degenerate, direct_angle};
pub use arc::{AngleLabel, ArcGeometry, ArcMeshBuilder, ArcOutline, LabelSettings, place_label};
pub use bounds::BoundingBox;
pub use camera::Viewpoint;
pub use frame::{Frame, UpAxis};
pub use mesh::{MeshError, TriangleMesh, load_obj, load_obj_from_bytes};
pub use ray::{Plane, Ray};
pub use surface::{
    AnchorInfo, CategoryMask, MeshScene, SurfaceFilter, SurfaceHit, SurfaceId, SurfaceQuery,
    cast_from_screen, snap_to_nearest_vertex,
};
pub use trace::{SurfaceLineTracer, TraceLine};
pub use vertex::{ArcVertex, LineVertex};
