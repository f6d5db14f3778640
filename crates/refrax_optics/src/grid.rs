//! Regular sample grids in the xy plane.

use refrax_math::DVec3;
use serde::{Deserialize, Serialize};

/// Extent and sampling density of a centered grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub width: f64,
    pub height: f64,
    /// Samples per unit along x
    pub x_density: f64,
    /// Samples per unit along y
    pub y_density: f64,
    /// Dots per unit on both axes, for dot-cloud rendering
    pub dot_density: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            width: 15.0,
            height: 15.0,
            x_density: 5.0,
            y_density: 5.0,
            dot_density: 20.0,
        }
    }
}

impl GridParams {
    pub fn points(&self) -> Vec<DVec3> {
        vector_field_grid(self.width, self.height, self.x_density, self.y_density)
    }

    pub fn dot_points(&self) -> Vec<DVec3> {
        dot_cloud_grid(self.width, self.height, self.dot_density)
    }

    pub fn dot_radius(&self) -> f64 {
        dot_radius(self.dot_density)
    }
}

/// Coordinates from `-extent/2` to `extent/2` inclusive, `1/density` apart.
///
/// A zero extent or non-positive density collapses to the single value 0.
fn axis_samples(extent: f64, density: f64) -> Vec<f64> {
    if extent <= 0.0 || density <= 0.0 || !extent.is_finite() || !density.is_finite() {
        return vec![0.0];
    }
    let step = 1.0 / density;
    // Slack so that extents that are an exact multiple of the step keep their far end
    let count = (extent * density + 1e-9).floor() as usize + 1;
    (0..count).map(|i| -extent / 2.0 + i as f64 * step).collect()
}

/// Centered grid of sample points for a vector field, x-major.
pub fn vector_field_grid(width: f64, height: f64, x_density: f64, y_density: f64) -> Vec<DVec3> {
    let xs = axis_samples(width, x_density);
    let ys = axis_samples(height, y_density);
    let mut points = Vec::with_capacity(xs.len() * ys.len());
    for &x in &xs {
        for &y in &ys {
            points.push(DVec3::new(x, y, 0.0));
        }
    }
    points
}

/// Centered grid of dots with equal spacing on both axes, x-major.
///
/// Dot radius for drawing is half the spacing, see [`dot_radius`].
pub fn dot_cloud_grid(width: f64, height: f64, density: f64) -> Vec<DVec3> {
    vector_field_grid(width, height, density, density)
}

/// Radius that makes neighbouring dots of a [`dot_cloud_grid`] just touch.
pub fn dot_radius(density: f64) -> f64 {
    0.5 / density
}
