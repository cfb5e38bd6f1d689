//! Viewpoint for pointer-to-world rays
//!
//! The orbit/pan/zoom controls live in the host application. The measurement
//! core only needs the current pose and projection to turn a pixel into a
//! world ray and to orient billboards toward the viewer.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::ray::Ray;

/// Perspective viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.5, 3.0), Vec3::ZERO, Vec3::Y)
    }
}

impl Viewpoint {
    /// Create a viewpoint with a 60° field of view and a 1280x720 viewport
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
            fov: 60.0_f32.to_radians(),
            near: 0.01,
            far: 1000.0,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }

    /// Set the viewport size in pixels
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self
    }

    /// Aspect ratio of the viewport
    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Unit right vector
    ///
    /// When `up` is parallel to the view direction any vector perpendicular
    /// to it is used, so looking straight along `up` still yields a basis.
    pub fn right(&self) -> Vec3 {
        let forward = self.forward();
        forward
            .cross(self.up)
            .try_normalize()
            .unwrap_or_else(|| forward.any_orthonormal_vector())
    }

    /// Unit up vector perpendicular to the view direction
    pub fn view_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.view_up())
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    /// World orientation of the viewpoint.
    ///
    /// Billboards take this rotation so they face the viewer with the
    /// viewpoint's up direction.
    pub fn rotation(&self) -> Quat {
        let forward = self.forward();
        let right = self.right();
        let up = self.view_up();
        Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
    }

    /// Convert screen coordinates to world ray
    ///
    /// `pixel` is measured from the top-left corner of the viewport.
    pub fn screen_to_ray(&self, pixel: Vec2) -> Ray {
        let ndc_x = (2.0 * pixel.x / self.viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * pixel.y / self.viewport.y);

        let inv_view_proj = (self.projection_matrix() * self.view_matrix()).inverse();
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far = far.truncate() / far.w;

        Ray::new(self.position, far - self.position)
    }

    /// Project a world point into pixel coordinates.
    ///
    /// Returns `None` for points behind the viewpoint.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.projection_matrix() * self.view_matrix() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}
