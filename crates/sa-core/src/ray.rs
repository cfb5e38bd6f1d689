//! Rays, planes and intersection tests
//!
//! The pointer picking, surface probing and marker hit testing all reduce to
//! a handful of ray queries. Every test here returns the ray parameter `t`
//! of the closest hit, so the hit point is `ray.at(t)`.

use glam::Vec3;

use crate::bounds::BoundingBox;
use crate::constants::{RAY_PLANE_EPSILON, RAY_TRIANGLE_EPSILON};

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Vec3,
    /// Unit direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// A zero direction yields a zero vector, which no intersection test hits.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A plane in 3D space (n·p + d = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal of the plane.
    pub normal: Vec3,
    /// Signed offset from the origin along the normal.
    pub distance: f32,
}

impl Plane {
    /// Creates a plane through `point` with the given normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            distance: -n.dot(point),
        }
    }

    /// Signed distance from a point to the plane.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Ray-plane intersection.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane lies
    /// behind the ray origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < RAY_PLANE_EPSILON {
            return None;
        }

        let t = -self.distance_to_point(ray.origin) / denom;
        if t < 0.0 {
            return None;
        }

        Some(t)
    }
}

/// Two-sided ray-triangle intersection (Möller–Trumbore).
///
/// # Algorithm
///
/// Solves `origin + t·dir = a + u·(b−a) + v·(c−a)` for `(t, u, v)` with
/// Cramer's rule, rejecting solutions where the barycentric coordinates fall
/// outside the triangle. Back faces are hit as well as front faces.
///
/// # Returns
///
/// * `Some(t)` - Ray parameter of the hit (`t >= 0`).
/// * `None` - The ray misses, is parallel to the triangle, or the triangle
///   is degenerate.
pub fn ray_triangle_intersection(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;

    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < RAY_TRIANGLE_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    if t < 0.0 {
        return None;
    }

    Some(t)
}

/// Ray-sphere intersection.
///
/// Returns the nearest non-negative ray parameter. A ray starting inside the
/// sphere reports its exit point.
pub fn ray_sphere_intersection(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    if near >= 0.0 {
        return Some(near);
    }

    let far = -b + sqrt_d;
    (far >= 0.0).then_some(far)
}

/// Ray-box slab test.
///
/// Returns the entry and exit parameters clipped to `t >= 0`, or `None`
/// when the ray misses the box entirely. An axis the ray does not move
/// along only requires the origin to lie within that slab, boundary
/// included.
pub fn ray_aabb_intersection(ray: &Ray, bbox: &BoundingBox) -> Option<(f32, f32)> {
    if !bbox.is_valid() {
        return None;
    }

    let mut t_near = 0.0_f32;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (min, max) = (bbox.min[axis], bbox.max[axis]);

        if dir == 0.0 {
            if origin < min || origin > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t0 = (min - origin) * inv;
        let t1 = (max - origin) * inv;
        t_near = t_near.max(t0.min(t1));
        t_far = t_far.min(t0.max(t1));
        if t_far < t_near {
            return None;
        }
    }

    Some((t_near, t_far))
}

/// Closest point on triangle `abc` to `p`.
///
/// Voronoi-region walk from Ericson, "Real-Time Collision Detection" §5.1.5.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
