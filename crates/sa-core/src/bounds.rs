//! Axis-aligned bounding boxes

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min and max points.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Creates a bounding box that contains all given points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |bbox, point| bbox.expand_to_include(point))
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size (full extents) of the bounding box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns true if the bounding box contains the given point.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Returns the box grown by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> BoundingBox {
        BoundingBox {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Clamps each axis of `point` into the box independently.
    ///
    /// Axes already inside the box are returned unchanged.
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Returns true if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Returns true if the box is valid and spans a non-zero size.
    ///
    /// A zero-sized box carries no clamping information.
    pub fn has_extent(&self) -> bool {
        self.is_valid() && self.size() != Vec3::ZERO
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_center() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.center(), Vec3::ZERO);
    }

    #[test]
    fn test_bounding_box_from_points() {
        let bbox = BoundingBox::from_points([
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(-1.0, 3.0, 0.0),
            Vec3::new(0.5, -1.0, 4.0),
        ]);
        assert_eq!(bbox.min, Vec3::new(-1.0, -1.0, -2.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 3.0, 4.0));
    }

    #[test]
    fn test_bounding_box_contains_point() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(bbox.contains_point(Vec3::ZERO));
        assert!(bbox.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!bbox.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_clamp_only_touches_violated_axes() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        let clamped = bbox.clamp_point(Vec3::new(3.0, 1.0, 0.5));
        assert_eq!(clamped, Vec3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn test_empty_box_has_no_extent() {
        assert!(!BoundingBox::empty().is_valid());
        assert!(!BoundingBox::new(Vec3::ONE, Vec3::ONE).has_extent());
        assert!(BoundingBox::new(Vec3::ZERO, Vec3::ONE).has_extent());
    }
}
