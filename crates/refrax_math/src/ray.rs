use crate::DVec3;
use serde::{Deserialize, Serialize};

/// A straight light path segment with an origin and a direction.
///
/// Angle computations in the optics code assume `direction` is unit length;
/// use [`Ray::normalized`] or [`Ray::through`] to get one.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Ray starting at `start` and heading toward `end`, with a unit direction.
    pub fn through(start: DVec3, end: DVec3) -> Self {
        Self::new(start, (end - start).normalize_or_zero())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Same ray with a unit direction (zero stays zero).
    pub fn normalized(&self) -> Self {
        Self::new(self.origin, self.direction.normalize_or_zero())
    }
}
