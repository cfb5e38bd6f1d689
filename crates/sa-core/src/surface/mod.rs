//! Surface queries
//!
//! Everything that needs to find geometry under a ray goes through the
//! [`SurfaceQuery`] trait: pointer placement, drag projection and the line
//! tracer. [`MeshScene`] is the bundled backend over plain triangle meshes.

mod scene;

use std::ops::BitOr;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bounds::BoundingBox;
use crate::camera::Viewpoint;
use crate::frame::Frame;
use crate::mesh::TriangleMesh;
use crate::ray::Ray;

pub use scene::{MeshScene, SceneSurface};

/// Identifies a surface within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 32-bit category (layer) bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);
    /// Category assigned to surfaces that were not given one
    pub const DEFAULT: Self = Self(1);

    /// Mask with only bit `index` set (`index` is taken modulo 32)
    pub const fn bit(index: u32) -> Self {
        Self(1 << (index % 32))
    }

    /// Returns true if any bit is shared with `other`
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CategoryMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Set of surface categories a query is allowed to hit.
///
/// Surfaces outside the set are transparent to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceFilter(pub CategoryMask);

impl SurfaceFilter {
    pub const ALL: Self = Self(CategoryMask::ALL);
    pub const NONE: Self = Self(CategoryMask::NONE);

    pub const fn new(categories: CategoryMask) -> Self {
        Self(categories)
    }

    pub const fn accepts(self, category: CategoryMask) -> bool {
        self.0.intersects(category)
    }
}

impl Default for SurfaceFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// Closest accepted surface along a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space contact point
    pub point: Vec3,
    /// World-space unit normal, facing the query origin
    pub normal: Vec3,
    /// Distance travelled along the query ray
    pub distance: f32,
    pub surface: SurfaceId,
    pub category: CategoryMask,
}

/// Current placement of a surface that points can be anchored to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorInfo {
    pub frame: Frame,
    /// Bounds in the surface's local space, used to clamp drags
    pub local_bounds: BoundingBox,
}

/// Raycasting capability over a scene
pub trait SurfaceQuery {
    /// Nearest accepted surface along `ray` within `max_distance`.
    fn cast_ray(&self, ray: &Ray, max_distance: f32, filter: SurfaceFilter) -> Option<SurfaceHit>;

    /// Nearest accepted surface touched by a sphere of `radius` swept along
    /// `ray` within `max_distance`.
    ///
    /// A sphere already overlapping a surface at the ray origin reports a
    /// hit at distance zero.
    fn cast_sphere(
        &self,
        ray: &Ray,
        radius: f32,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Option<SurfaceHit>;

    /// Current frame and local bounds of a surface.
    fn anchor(&self, id: SurfaceId) -> Option<AnchorInfo>;

    /// Local-space mesh of a surface, if it has one.
    fn mesh(&self, id: SurfaceId) -> Option<&TriangleMesh>;
}

/// Cast the ray under a screen pixel into the scene.
pub fn cast_from_screen(
    query: &dyn SurfaceQuery,
    viewpoint: &Viewpoint,
    pixel: Vec2,
    filter: SurfaceFilter,
) -> Option<SurfaceHit> {
    let ray = viewpoint.screen_to_ray(pixel);
    query.cast_ray(&ray, f32::INFINITY, filter)
}

/// World position of the mesh vertex closest to `approx`.
///
/// Scans every vertex; on ties the first one encountered wins. An empty
/// mesh returns `approx` unchanged.
pub fn snap_to_nearest_vertex(mesh: &TriangleMesh, frame: &Frame, approx: Vec3) -> Vec3 {
    let mut best = approx;
    let mut best_dist_sq = f32::INFINITY;

    for vertex in mesh.world_vertices(frame) {
        let dist_sq = vertex.distance_squared(approx);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = vertex;
        }
    }

    best
}
