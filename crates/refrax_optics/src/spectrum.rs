//! Visible spectrum colors for dispersed beams.

use refrax_math::DVec3;

/// Color type alias (linear RGB, 0-1)
pub type Color = DVec3;

/// Wavelength shown at alpha 0 (lowest index, least bent).
pub const RED_WAVELENGTH_NM: f64 = 700.0;

/// Wavelength shown at alpha 1 (highest index, most bent).
pub const VIOLET_WAVELENGTH_NM: f64 = 400.0;

/// Wavelength in nanometres for a position in the sampled index range.
pub fn wavelength_for_alpha(alpha: f64) -> f64 {
    let alpha = alpha.clamp(0.0, 1.0);
    RED_WAVELENGTH_NM + alpha * (VIOLET_WAVELENGTH_NM - RED_WAVELENGTH_NM)
}

/// Display color for `alpha` in [0, 1], running red → green → violet.
///
/// The brightest channel is always 1 so faint ends of the spectrum stay visible.
pub fn spectral_color(alpha: f64) -> Color {
    let rgb = xyz_to_linear_srgb(cie_color_matching(wavelength_for_alpha(alpha))).max(Color::ZERO);
    let peak = rgb.max_element();
    if peak > 0.0 {
        rgb / peak
    } else {
        rgb
    }
}

/// CIE 1931 color matching functions (multi-lobe Gaussian fit)
fn cie_color_matching(wavelength: f64) -> DVec3 {
    let x = 1.056 * gaussian(wavelength, 599.8, 37.9) + 0.362 * gaussian(wavelength, 442.0, 16.0)
        - 0.065 * gaussian(wavelength, 501.1, 20.4);

    let y = 0.821 * gaussian(wavelength, 568.8, 46.9) + 0.286 * gaussian(wavelength, 530.9, 31.1);

    let z = 1.217 * gaussian(wavelength, 437.0, 11.8) + 0.681 * gaussian(wavelength, 459.0, 26.0);

    DVec3::new(x, y, z).max(DVec3::ZERO)
}

#[inline]
fn gaussian(x: f64, mean: f64, sigma: f64) -> f64 {
    let t = (x - mean) / sigma;
    (-0.5 * t * t).exp()
}

fn xyz_to_linear_srgb(xyz: DVec3) -> Color {
    Color::new(
        3.2404542 * xyz.x - 1.5371385 * xyz.y - 0.4985314 * xyz.z,
        -0.9692660 * xyz.x + 1.8760108 * xyz.y + 0.0415560 * xyz.z,
        0.0556434 * xyz.x - 0.2040259 * xyz.y + 1.0572252 * xyz.z,
    )
}
