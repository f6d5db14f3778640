//! Where evenly spaced wavefronts cross an interface.
//!
//! Parallel wavefront lines `spacing` apart meet a straight interface at points
//! spaced `spacing / sin(angle)` apart, where `angle` is between the lines and
//! the interface. Matching that spacing on both sides of the interface, with a
//! shorter wavelength in the slower medium, is the geometric form of Snell's law.

use refrax_math::{angle_between, DVec3};

/// Distance along the interface between neighbouring crossings.
pub fn crossing_spacing(interface_direction: DVec3, line_direction: DVec3, spacing: f64) -> f64 {
    spacing / angle_between(interface_direction, line_direction).sin()
}

/// Crossing points of `n_lines` wavefronts, centered on `center`.
///
/// Offsets run from `floor(-n/2)` to `floor(n/2)` steps along the interface, so an
/// odd count gets one extra crossing on the negative side.
pub fn crossing_points(
    center: DVec3,
    interface_direction: DVec3,
    line_direction: DVec3,
    spacing: f64,
    n_lines: usize,
) -> Vec<DVec3> {
    let interface_direction = interface_direction.normalize_or_zero();
    let step = crossing_spacing(interface_direction, line_direction, spacing);
    let n = n_lines as i64;
    ((-n).div_euclid(2)..=n / 2)
        .map(|i| center + i as f64 * step * interface_direction)
        .collect()
}

/// Wavefront spacing inside a medium of relative index `index`.
pub fn spacing_in_medium(spacing: f64, index: f64) -> f64 {
    spacing / index
}
