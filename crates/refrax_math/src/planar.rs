//! Planar vector helpers.
//!
//! Rotations and signed angles are taken about the `OUT` (+z) axis, so they
//! describe geometry drawn in the xy plane. The z component is carried through
//! rotations unchanged and ignored by the 2D intersection test.

use glam::{DMat3, DVec3};

use crate::OUT;

/// Direction products below this (relative to the vector lengths) count as parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Rotate `v` counter-clockwise by `angle` radians about the out-of-screen axis.
pub fn rotate_vector(v: DVec3, angle: f64) -> DVec3 {
    DMat3::from_rotation_z(angle) * v
}

/// Unsigned angle between two vectors, in [0, π].
///
/// Returns 0 if either vector has zero length.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let a = normalize_or_zero(a);
    let b = normalize_or_zero(b);
    if a == DVec3::ZERO || b == DVec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Signed angle that rotates `from` onto `to` about the out-of-screen axis, in (-π, π].
///
/// Positive means counter-clockwise. Both vectors are projected onto the xy plane.
pub fn signed_angle(from: DVec3, to: DVec3) -> f64 {
    let cross = from.cross(to).dot(OUT);
    let dot = from.x * to.x + from.y * to.y;
    cross.atan2(dot)
}

/// Polar angle of a vector's xy projection, measured from +x.
pub fn angle_of_vector(v: DVec3) -> f64 {
    v.y.atan2(v.x)
}

/// Unit vector in the direction of `v`, or zero if `v` is zero or not finite.
pub fn normalize_or_zero(v: DVec3) -> DVec3 {
    v.normalize_or_zero()
}

/// Intersection of the line through `p0` along `v0` with the line through `p1` along `v1`.
///
/// Both lines are treated as infinite and intersected in the xy plane; the
/// result lies on the first line. Returns `None` when the lines are parallel
/// or either direction is zero.
pub fn line_intersection(p0: DVec3, v0: DVec3, p1: DVec3, v1: DVec3) -> Option<DVec3> {
    let normal = v1.cross(OUT);
    let denom = v0.dot(normal);
    let scale = v0.length() * v1.length();
    if scale == 0.0 || denom.abs() <= PARALLEL_EPSILON * scale {
        return None;
    }
    let t = (p1 - p0).dot(normal) / denom;
    Some(p0 + t * v0)
}
