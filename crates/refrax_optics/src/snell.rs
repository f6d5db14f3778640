//! Snell's law at a single planar interface.
//!
//! Angles are signed rotations about the out-of-screen axis, measured from the
//! surface normal oriented along the direction of travel. The first medium has
//! index 1.0 and `index` is the second medium relative to it.

use refrax_math::{rotate_vector, signed_angle, DVec3, Ray};

use crate::error::{OpticsError, OpticsResult, Surface};

/// Tolerance for sines that overshoot ±1 by rounding alone.
const SINE_SLACK: f64 = 1e-12;

fn checked_asin(sine: f64, surface: Surface, index: f64) -> OpticsResult<f64> {
    if !sine.is_finite() || sine.abs() > 1.0 + SINE_SLACK {
        return Err(OpticsError::TotalInternalReflection {
            surface,
            index,
            sine,
        });
    }
    Ok(sine.clamp(-1.0, 1.0).asin())
}

/// Refracted angle when entering a medium of relative index `index`: `asin(sin θ1 / index)`.
pub fn refraction_angle(theta1: f64, index: f64) -> OpticsResult<f64> {
    checked_asin(theta1.sin() / index, Surface::Entry, index)
}

/// Refracted angle when leaving a medium of relative index `index`: `asin(sin θ3 · index)`.
pub fn emergence_angle(theta3: f64, index: f64) -> OpticsResult<f64> {
    checked_asin(theta3.sin() * index, Surface::Exit, index)
}

/// Refracted angle from wave speeds, `sin θ1 / v1 = sin θ2 / v2`.
pub fn angle_from_speeds(theta1: f64, v1: f64, v2: f64) -> OpticsResult<f64> {
    if v1 == 0.0 || v2 == 0.0 {
        return Err(OpticsError::InvalidParameter(format!(
            "wave speeds must be nonzero (v1 = {v1}, v2 = {v2})"
        )));
    }
    refraction_angle(theta1, v1 / v2)
}

/// Largest exit angle that still refracts out of a medium of relative index `index`.
///
/// `None` when `index <= 1`, where every exit angle refracts.
pub fn critical_angle(index: f64) -> Option<f64> {
    if index > 1.0 {
        Some((1.0 / index).asin())
    } else {
        None
    }
}

/// Flip `normal` if needed so it points along `direction`.
pub fn oriented_normal(normal: DVec3, direction: DVec3) -> DVec3 {
    if normal.dot(direction) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Normal oriented along `direction`, and the signed angle from that normal to `direction`.
pub fn incidence_angle(normal: DVec3, direction: DVec3) -> (DVec3, f64) {
    let normal = oriented_normal(normal, direction);
    (normal, signed_angle(normal, direction))
}

/// Refract `ray` at `hit_point` on a surface with the given normal.
///
/// The returned ray starts at `hit_point`. Either orientation of `normal` works.
pub fn refract_at_interface(
    ray: &Ray,
    hit_point: DVec3,
    normal: DVec3,
    index: f64,
) -> OpticsResult<Ray> {
    let (normal, theta1) = incidence_angle(normal.normalize_or_zero(), ray.direction());
    let theta2 = refraction_angle(theta1, index)?;
    Ok(Ray::new(hit_point, rotate_vector(normal, theta2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refrax_math::{angle_between, DOWN, RIGHT, UP};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_refraction_angle_bends_toward_normal() {
        let theta1 = 40f64.to_radians();
        let theta2 = refraction_angle(theta1, 1.5).unwrap();

        assert!(theta2 < theta1);
        assert!((theta1.sin() / theta2.sin() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_refraction_preserves_sign() {
        let theta2 = refraction_angle(-0.5, 1.3).unwrap();
        assert!(theta2 < 0.0);
        assert!((theta2 + refraction_angle(0.5, 1.3).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_index_one_is_identity() {
        let theta = 0.7;
        assert!((refraction_angle(theta, 1.0).unwrap() - theta).abs() < 1e-12);
        assert!((emergence_angle(theta, 1.0).unwrap() - theta).abs() < 1e-12);
    }

    #[test]
    fn test_entry_domain_error() {
        // sin(60°) / 0.5 > 1
        let err = refraction_angle(60f64.to_radians(), 0.5).unwrap_err();
        match err {
            OpticsError::TotalInternalReflection { surface, index, sine } => {
                assert_eq!(surface, Surface::Entry);
                assert_eq!(index, 0.5);
                assert!(sine > 1.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_exit_domain_error() {
        let err = emergence_angle(50f64.to_radians(), 1.5).unwrap_err();
        assert!(matches!(
            err,
            OpticsError::TotalInternalReflection { surface: Surface::Exit, .. }
        ));
    }

    #[test]
    fn test_zero_index_is_error() {
        assert!(refraction_angle(0.3, 0.0).is_err());
    }

    #[test]
    fn test_grazing_incidence_is_allowed() {
        let theta2 = refraction_angle(FRAC_PI_2, 1.0).unwrap();
        assert!((theta2 - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_angle_from_speeds() {
        // The simple Snell scene: 40° in, slower second medium
        let theta1 = 40f64.to_radians();
        let theta2 = angle_from_speeds(theta1, 1.0, 0.66).unwrap();
        assert!((theta1.sin() / 1.0 - theta2.sin() / 0.66).abs() < 1e-12);

        assert!(angle_from_speeds(theta1, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_critical_angle() {
        let critical = critical_angle(1.5).unwrap();
        assert!(emergence_angle(critical - 1e-6, 1.5).is_ok());
        assert!(emergence_angle(critical + 1e-3, 1.5).is_err());
        assert!(critical_angle(1.0).is_none());
    }

    #[test]
    fn test_oriented_normal() {
        assert_eq!(oriented_normal(UP, DOWN), DOWN);
        assert_eq!(oriented_normal(DOWN, DOWN), DOWN);
    }

    #[test]
    fn test_refract_at_interface() {
        // Ray coming down-right onto a horizontal surface
        let theta1 = 40f64.to_radians();
        let direction = rotate_vector(DOWN, theta1);
        let ray = Ray::new(DVec3::new(-1.0, 1.0, 0.0), direction);

        let refracted = refract_at_interface(&ray, DVec3::ZERO, UP, 1.5).unwrap();

        assert_eq!(refracted.origin, DVec3::ZERO);
        assert!((refracted.direction.length() - 1.0).abs() < 1e-12);
        // Still travelling downward and to the right
        assert!(refracted.direction.y < 0.0);
        assert!(refracted.direction.dot(RIGHT) > 0.0);

        let theta2 = angle_between(DOWN, refracted.direction);
        assert!((theta1.sin() / theta2.sin() - 1.5).abs() < 1e-9);
    }
}
