//! Planar interfaces and the media on either side of them.

use refrax_math::{DVec3, ORIGIN, DR};
use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, OpticsResult};

/// A planar boundary between two media.
///
/// Points with positive depth along `normal` are inside the second medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interface {
    pub origin: DVec3,
    pub normal: DVec3,
}

impl Interface {
    /// Create an interface, normalizing `normal`.
    pub fn new(origin: DVec3, normal: DVec3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Signed distance of `point` past the interface, along the normal.
    #[inline]
    pub fn depth(&self, point: DVec3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    pub fn validate(&self) -> OpticsResult<()> {
        if !self.origin.is_finite() {
            return Err(OpticsError::InvalidParameter(
                "interface origin must be finite".into(),
            ));
        }
        if self.normal.length_squared() == 0.0 || !self.normal.is_finite() {
            return Err(OpticsError::InvalidParameter(
                "interface normal must be a nonzero vector".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self::new(ORIGIN, DR)
    }
}

/// Wave speed and the refractive index of the second medium.
///
/// The first medium has index 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medium {
    /// Wave speed
    pub c: f64,
    /// Refractive index of the second medium
    pub index: f64,
}

impl Medium {
    pub fn new(c: f64, index: f64) -> Self {
        Self { c, index }
    }

    /// Spatial frequency `f / c` in the first medium.
    pub fn wavenumber(&self, frequency: f64) -> f64 {
        frequency / self.c
    }

    /// Wavelength `c / f` in the first medium.
    pub fn wavelength(&self, frequency: f64) -> f64 {
        self.c / frequency
    }

    /// Wave speed inside the second medium.
    pub fn speed_in_medium(&self) -> f64 {
        self.c / self.index
    }

    pub fn validate(&self) -> OpticsResult<()> {
        if self.c == 0.0 || !self.c.is_finite() {
            return Err(OpticsError::InvalidParameter(format!(
                "wave speed must be finite and nonzero, got {}",
                self.c
            )));
        }
        if self.index == 0.0 || !self.index.is_finite() {
            return Err(OpticsError::InvalidParameter(format!(
                "refractive index must be finite and nonzero, got {}",
                self.index
            )));
        }
        Ok(())
    }
}

impl Default for Medium {
    fn default() -> Self {
        Self { c: 2.0, index: 1.5 }
    }
}
