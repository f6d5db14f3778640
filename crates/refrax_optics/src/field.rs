//! Time-varying vector fields.
//!
//! A [`PhaseField`] is a pure function of (point, time). [`TimeVaryingField`]
//! pairs one with a set of sample points and a clock that only moves forward,
//! the way an animation evaluates the field once per frame.

use refrax_math::DVec3;

use crate::error::{OpticsError, OpticsResult};

/// A vector field that depends on position and time.
pub trait PhaseField: Send + Sync {
    /// Field vector at a single point.
    fn vector_at(&self, point: DVec3, time: f64) -> DVec3;

    /// Field vectors for a batch of points, in order.
    fn evaluate(&self, points: &[DVec3], time: f64) -> Vec<DVec3> {
        points.iter().map(|&p| self.vector_at(p, time)).collect()
    }
}

/// A field sampled at fixed points with its own clock.
#[derive(Debug, Clone)]
pub struct TimeVaryingField<F> {
    field: F,
    points: Vec<DVec3>,
    time: f64,
    suspended: bool,
}

impl<F: PhaseField> TimeVaryingField<F> {
    /// Start the clock at zero.
    pub fn new(field: F, points: Vec<DVec3>) -> Self {
        Self {
            field,
            points,
            time: 0.0,
            suspended: false,
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Advance the clock by `dt`, unless suspended.
    ///
    /// Time never runs backwards: a negative or non-finite `dt` is rejected.
    pub fn tick(&mut self, dt: f64) -> OpticsResult<f64> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(OpticsError::InvalidParameter(format!(
                "time step must be finite and non-negative, got {dt}"
            )));
        }
        if !self.suspended {
            self.time += dt;
        }
        Ok(self.time)
    }

    /// Freeze the clock; ticks are ignored until [`resume`](Self::resume).
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Jump to a saved time, e.g. to keep two fields in step.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Replace the sample points, keeping the clock.
    pub fn set_points(&mut self, points: Vec<DVec3>) {
        self.points = points;
    }

    /// Evaluate the field at every sample point at the current time.
    pub fn sample(&self) -> Vec<DVec3> {
        self.field.evaluate(&self.points, self.time)
    }
}
