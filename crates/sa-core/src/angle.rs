//! Plane-projected angle basis
//!
//! For three points A, B, C with B as vertex, the angle is measured in the
//! plane spanned by BA and BC. The basis places BA on the plane's x axis so
//! the arm directions can be parameterized by a single polar angle, which
//! the arc mesh and label placement both sample.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::constants::{COLLINEAR_EPSILON, DEGENERATE_LENGTH_SQ};

/// Reasons three points do not define an angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Degenerate {
    #[error("Degenerate angle: an arm has zero length")]
    ZeroLength,
    #[error("Degenerate angle: points are collinear")]
    Collinear,
}

/// Orthonormal plane frame and polar sweep of an angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleBasis {
    /// Unit normal of the plane through A, B, C (`BA × BC`)
    pub plane_normal: Vec3,
    /// In-plane axis along BA
    pub x_axis: Vec3,
    /// In-plane axis, `plane_normal × x_axis`
    pub y_axis: Vec3,
    /// Polar angle of BA in `[0, 2π)`
    pub start_angle: f32,
    /// Unsigned included angle in `[0, π]`
    pub sweep_angle: f32,
    /// Direction of travel from BA to BC: `1.0` or `-1.0`
    pub rotation_sign: f32,
}

impl AngleBasis {
    /// Compute the basis for the angle ABC.
    ///
    /// # Errors
    ///
    /// * [`Degenerate::ZeroLength`] - A or C coincides with B.
    /// * [`Degenerate::Collinear`] - The three points lie on one line.
    pub fn compute(a: Vec3, b: Vec3, c: Vec3) -> Result<Self, Degenerate> {
        let (ba, bc) = arms(a, b, c)?;

        let cross = ba.cross(bc);
        if cross.length() < COLLINEAR_EPSILON {
            return Err(Degenerate::Collinear);
        }
        let plane_normal = cross.normalize();

        // Re-project BA so the axes stay orthogonal under rounding
        let x_axis = (ba - ba.dot(plane_normal) * plane_normal).normalize();
        let y_axis = plane_normal.cross(x_axis);

        let angle_a = normalize_angle(y_axis.dot(ba).atan2(x_axis.dot(ba)));
        let angle_c = normalize_angle(y_axis.dot(bc).atan2(x_axis.dot(bc)));
        let delta = shortest_delta(angle_a, angle_c);

        Ok(Self {
            plane_normal,
            x_axis,
            y_axis,
            start_angle: angle_a,
            sweep_angle: delta.abs(),
            rotation_sign: if delta < 0.0 { -1.0 } else { 1.0 },
        })
    }

    /// Included angle in degrees
    pub fn degrees(&self) -> f32 {
        self.sweep_angle.to_degrees()
    }

    /// Unit in-plane direction at polar angle `angle`
    pub fn direction_at(&self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        (cos * self.x_axis + sin * self.y_axis).normalize()
    }

    /// Polar angle at fraction `t` of the sweep (0 = BA, 1 = BC)
    pub fn angle_at(&self, t: f32) -> f32 {
        self.start_angle + self.rotation_sign * t * self.sweep_angle
    }

    /// Unit direction halfway between BA and BC
    pub fn bisector(&self) -> Vec3 {
        self.direction_at(self.angle_at(0.5))
    }
}

/// Unsigned angle between BA and BC by `acos` of the dot product.
pub fn direct_angle(a: Vec3, b: Vec3, c: Vec3) -> Result<f32, Degenerate> {
    let (ba, bc) = arms(a, b, c)?;
    Ok(ba.dot(bc).clamp(-1.0, 1.0).acos())
}

fn arms(a: Vec3, b: Vec3, c: Vec3) -> Result<(Vec3, Vec3), Degenerate> {
    let ba = a - b;
    let bc = c - b;
    if ba.length_squared() < DEGENERATE_LENGTH_SQ || bc.length_squared() < DEGENERATE_LENGTH_SQ {
        return Err(Degenerate::ZeroLength);
    }
    Ok((ba.normalize(), bc.normalize()))
}

/// Wrap into `[0, 2π)`
fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in `(−π, π]`
fn shortest_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI { delta - TAU } else { delta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_right_angle_basis() {
        let basis =
            AngleBasis::compute(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0))
                .unwrap();

        assert_relative_eq!(basis.degrees(), 90.0, epsilon = 1e-4);
        assert_eq!(basis.rotation_sign, 1.0);
        assert_abs_diff_eq!(basis.x_axis, Vec3::Z, epsilon = 1e-6);
        assert_abs_diff_eq!(basis.y_axis.dot(basis.x_axis), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(basis.y_axis.dot(basis.plane_normal), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(basis.direction_at(basis.angle_at(1.0)), Vec3::X, epsilon = 1e-5);
    }

    #[test]
    fn test_sweep_matches_direct_angle() {
        let cases = [
            (Vec3::new(1.0, 0.2, 0.0), Vec3::ZERO, Vec3::new(-0.3, 1.0, 0.5)),
            (Vec3::new(3.0, 1.0, -2.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.5, -2.0, 0.7)),
            (Vec3::new(-1.0, 0.01, 0.0), Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)),
            (Vec3::new(0.1, 0.0, 0.0), Vec3::ZERO, Vec3::new(0.1, 0.001, 0.0)),
        ];

        for (a, b, c) in cases {
            let basis = AngleBasis::compute(a, b, c).unwrap();
            let direct = direct_angle(a, b, c).unwrap();
            assert_abs_diff_eq!(basis.sweep_angle, direct, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_swapping_arms_keeps_sweep() {
        let a = Vec3::new(2.0, 0.5, 0.0);
        let b = Vec3::new(0.0, 0.5, 0.0);
        let c = Vec3::new(1.0, 0.5, 1.7);

        let forward = AngleBasis::compute(a, b, c).unwrap();
        let swapped = AngleBasis::compute(c, b, a).unwrap();
        assert_abs_diff_eq!(forward.sweep_angle, swapped.sweep_angle, epsilon = 1e-5);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(AngleBasis::compute(p, p, Vec3::ZERO), Err(Degenerate::ZeroLength));
        assert_eq!(AngleBasis::compute(Vec3::ZERO, p, p), Err(Degenerate::ZeroLength));
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let straight = AngleBasis::compute(Vec3::NEG_X, Vec3::ZERO, Vec3::X);
        assert_eq!(straight, Err(Degenerate::Collinear));

        let folded = AngleBasis::compute(Vec3::X * 2.0, Vec3::ZERO, Vec3::X);
        assert_eq!(folded, Err(Degenerate::Collinear));
    }

    #[test]
    fn test_bisector() {
        let basis = AngleBasis::compute(Vec3::X, Vec3::ZERO, Vec3::Y).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_abs_diff_eq!(basis.bisector(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_helpers() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(shortest_delta(0.1, TAU - 0.1), -0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(shortest_delta(TAU - 0.1, 0.1), 0.2, epsilon = 1e-5);
    }
}
