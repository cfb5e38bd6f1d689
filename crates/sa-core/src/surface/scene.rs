//! Triangle mesh scene backend

use glam::Vec3;

use crate::bounds::BoundingBox;
use crate::constants::{SPHERE_CAST_REFINE_STEPS, SPHERE_CAST_STEP_FACTOR};
use crate::frame::Frame;
use crate::mesh::TriangleMesh;
use crate::ray::{Ray, closest_point_on_triangle, ray_aabb_intersection, ray_triangle_intersection};

use super::{AnchorInfo, CategoryMask, SurfaceFilter, SurfaceHit, SurfaceId, SurfaceQuery};

/// A mesh placed in the scene
#[derive(Debug, Clone)]
pub struct SceneSurface {
    pub id: SurfaceId,
    pub name: String,
    pub category: CategoryMask,
    pub frame: Frame,
    pub mesh: TriangleMesh,
    /// Bounds used to clamp drags of points anchored here
    pub local_bounds: BoundingBox,
    mesh_bounds: BoundingBox,
}

impl SceneSurface {
    fn to_local(&self, ray: &Ray) -> Ray {
        Ray {
            origin: self.frame.inverse_transform_point(ray.origin),
            direction: self.frame.inverse_transform_vector(ray.direction),
        }
    }

    /// Nearest triangle hit in local space: `(t, unit face normal)`
    fn raycast_local(&self, ray: &Ray, max_distance: f32) -> Option<(f32, Vec3)> {
        let (t_near, _) = ray_aabb_intersection(ray, &self.mesh_bounds)?;
        if t_near > max_distance {
            return None;
        }

        let mut best: Option<(f32, Vec3)> = None;
        for [a, b, c] in self.mesh.triangles() {
            let Some(t) = ray_triangle_intersection(ray, a, b, c) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|(best_t, _)| t >= best_t) {
                continue;
            }
            best = Some((t, (b - a).cross(c - a).normalize_or_zero()));
        }
        best
    }

    /// Closest surface point to `p` in local space: `(point, distance², face normal)`
    fn closest_point_local(&self, p: Vec3) -> Option<(Vec3, f32, Vec3)> {
        let mut best: Option<(Vec3, f32, Vec3)> = None;
        for [a, b, c] in self.mesh.triangles() {
            let q = closest_point_on_triangle(p, a, b, c);
            let dist_sq = q.distance_squared(p);
            if best.is_some_and(|(_, best_sq, _)| dist_sq >= best_sq) {
                continue;
            }
            best = Some((q, dist_sq, (b - a).cross(c - a).normalize_or_zero()));
        }
        best
    }

    /// Marched swept-sphere test in local space: `(t, contact point, normal)`.
    ///
    /// The path is sampled every `radius * SPHERE_CAST_STEP_FACTOR` and the
    /// first overlapping sample is refined by bisection, so grazing
    /// contacts thinner than a step may be missed.
    fn sphere_cast_local(&self, ray: &Ray, radius: f32, max_distance: f32) -> Option<(f32, Vec3, Vec3)> {
        let (t_near, t_far) = ray_aabb_intersection(ray, &self.mesh_bounds.inflate(radius))?;
        let t_end = t_far.min(max_distance);
        if t_near > t_end {
            return None;
        }

        let radius_sq = radius * radius;
        let overlaps = |t: f32| {
            self.closest_point_local(ray.at(t))
                .filter(|(_, dist_sq, _)| *dist_sq <= radius_sq)
        };

        let step = (radius * SPHERE_CAST_STEP_FACTOR).max(f32::EPSILON);
        let mut prev = t_near;
        let mut t = t_near;
        let mut contact = None;
        loop {
            if let Some(found) = overlaps(t) {
                contact = Some((t, found));
                break;
            }
            if t >= t_end {
                break;
            }
            prev = t;
            t = (t + step).min(t_end);
        }

        let (mut hit_t, mut found) = contact?;
        if hit_t > t_near {
            let (mut lo, mut hi) = (prev, hit_t);
            for _ in 0..SPHERE_CAST_REFINE_STEPS {
                let mid = 0.5 * (lo + hi);
                match overlaps(mid) {
                    Some(mid_found) => {
                        hi = mid;
                        found = mid_found;
                    }
                    None => lo = mid,
                }
            }
            hit_t = hi;
        }

        let (point, _, face_normal) = found;
        let normal = (ray.at(hit_t) - point)
            .try_normalize()
            .unwrap_or(face_normal);
        Some((hit_t, point, normal))
    }
}

/// Scene of rigidly placed triangle meshes
#[derive(Debug, Clone, Default)]
pub struct MeshScene {
    surfaces: Vec<SceneSurface>,
}

impl MeshScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh under `frame`; its drag bounds default to the mesh bounds
    pub fn add_surface(
        &mut self,
        name: impl Into<String>,
        mesh: TriangleMesh,
        frame: Frame,
        category: CategoryMask,
    ) -> SurfaceId {
        let id = SurfaceId::new();
        let mesh_bounds = mesh.bounds();
        let name = name.into();
        tracing::debug!(%id, %name, triangles = mesh.triangle_count(), "Added surface");
        self.surfaces.push(SceneSurface {
            id,
            name,
            category,
            frame,
            mesh,
            local_bounds: mesh_bounds,
            mesh_bounds,
        });
        id
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<SceneSurface> {
        let index = self.surfaces.iter().position(|s| s.id == id)?;
        Some(self.surfaces.remove(index))
    }

    pub fn get(&self, id: SurfaceId) -> Option<&SceneSurface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneSurface> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &SceneSurface> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Move a surface. Returns false if the id is unknown.
    pub fn set_frame(&mut self, id: SurfaceId, frame: Frame) -> bool {
        match self.surfaces.iter_mut().find(|s| s.id == id) {
            Some(surface) => {
                surface.frame = frame;
                true
            }
            None => false,
        }
    }

    /// Override the drag bounds of a surface. Returns false if the id is unknown.
    pub fn set_local_bounds(&mut self, id: SurfaceId, bounds: BoundingBox) -> bool {
        match self.surfaces.iter_mut().find(|s| s.id == id) {
            Some(surface) => {
                surface.local_bounds = bounds;
                true
            }
            None => false,
        }
    }

    fn accepted(&self, filter: SurfaceFilter) -> impl Iterator<Item = &SceneSurface> {
        self.surfaces.iter().filter(move |s| filter.accepts(s.category))
    }
}

/// Orient a local normal to world space, facing against `direction`
fn facing_normal(surface: &SceneSurface, local_normal: Vec3, direction: Vec3) -> Vec3 {
    let normal = surface.frame.transform_vector(local_normal).normalize_or_zero();
    if normal.dot(direction) > 0.0 { -normal } else { normal }
}

impl SurfaceQuery for MeshScene {
    fn cast_ray(&self, ray: &Ray, max_distance: f32, filter: SurfaceFilter) -> Option<SurfaceHit> {
        let mut best: Option<SurfaceHit> = None;

        for surface in self.accepted(filter) {
            let limit = best.map_or(max_distance, |hit| hit.distance);
            let Some((t, local_normal)) = surface.raycast_local(&surface.to_local(ray), limit) else {
                continue;
            };
            if best.is_some_and(|hit| t >= hit.distance) {
                continue;
            }
            best = Some(SurfaceHit {
                point: ray.at(t),
                normal: facing_normal(surface, local_normal, ray.direction),
                distance: t,
                surface: surface.id,
                category: surface.category,
            });
        }

        best
    }

    fn cast_sphere(
        &self,
        ray: &Ray,
        radius: f32,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Option<SurfaceHit> {
        if radius <= 0.0 {
            return self.cast_ray(ray, max_distance, filter);
        }

        let mut best: Option<SurfaceHit> = None;

        for surface in self.accepted(filter) {
            let limit = best.map_or(max_distance, |hit| hit.distance);
            let local_ray = surface.to_local(ray);
            let Some((t, local_point, local_normal)) =
                surface.sphere_cast_local(&local_ray, radius, limit)
            else {
                continue;
            };
            if best.is_some_and(|hit| t >= hit.distance) {
                continue;
            }
            best = Some(SurfaceHit {
                point: surface.frame.transform_point(local_point),
                normal: facing_normal(surface, local_normal, ray.direction),
                distance: t,
                surface: surface.id,
                category: surface.category,
            });
        }

        best
    }

    fn anchor(&self, id: SurfaceId) -> Option<AnchorInfo> {
        self.get(id).map(|s| AnchorInfo {
            frame: s.frame,
            local_bounds: s.local_bounds,
        })
    }

    fn mesh(&self, id: SurfaceId) -> Option<&TriangleMesh> {
        self.get(id).map(|s| &s.mesh)
    }
}
