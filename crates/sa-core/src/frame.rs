//! Rigid reference frames
//!
//! Points and derived geometry never rely on an inherited transform
//! hierarchy. Instead each item stores the frame of its logical anchor,
//! resolved once per tick, and converts between world and local space
//! explicitly.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position + rotation of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Origin of the frame in world space.
    pub translation: Vec3,
    /// Orientation of the frame in world space.
    pub rotation: Quat,
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Frame {
    /// The world frame.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a frame from a translation and rotation.
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
        }
    }

    /// Creates an unrotated frame at `translation`.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Local point to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + self.rotation * local
    }

    /// World point to local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.translation)
    }

    /// Local direction to world space.
    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// World direction to local space.
    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    /// Re-expresses a world point that was attached to `self` under `moved`.
    pub fn carry_point(&self, world: Vec3, moved: &Frame) -> Vec3 {
        moved.transform_point(self.inverse_transform_point(world))
    }
}

/// World axis treated as "height" when pinning drags and lifting labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpAxis {
    /// Y-up worlds
    #[default]
    Y,
    /// Z-up worlds
    Z,
}

impl UpAxis {
    /// Unit vector of the axis.
    pub fn vector(&self) -> Vec3 {
        match self {
            UpAxis::Y => Vec3::Y,
            UpAxis::Z => Vec3::Z,
        }
    }

    /// Height component of a point.
    pub fn height(&self, point: Vec3) -> f32 {
        match self {
            UpAxis::Y => point.y,
            UpAxis::Z => point.z,
        }
    }

    /// Returns `point` with its height component replaced.
    pub fn with_height(&self, point: Vec3, height: f32) -> Vec3 {
        match self {
            UpAxis::Y => Vec3::new(point.x, height, point.z),
            UpAxis::Z => Vec3::new(point.x, point.y, height),
        }
    }
}
