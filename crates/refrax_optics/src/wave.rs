//! Plane wave refracting into a second medium.
//!
//! The wave is a scalar phase field over space and time. Points past the
//! interface pick up extra phase in proportion to how deep they sit inside
//! the second medium, which bends and compresses the wavefronts there.
//!
//! For a point `p` at time `t`:
//!
//! ```text
//! k        = f / c
//! phase    = 2π (k (p · dir) − f t)
//! kickback = max((p − origin) · normal, 0)
//! phase   += kickback · index · c
//! vector   = amplitude · cos(phase) · OUT
//! ```

use std::f64::consts::TAU;

use refrax_math::{DVec3, OUT, RIGHT};
use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, OpticsResult};
use crate::field::PhaseField;
use crate::medium::{Interface, Medium};

/// Maps a field vector's norm to a display opacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpacityCurve {
    /// `tanh(n)`
    #[default]
    Tanh,
    /// `1 / (1 + e^-n)`
    Sigmoid,
    /// `scale · sigmoid(gain · n)`
    ScaledSigmoid { scale: f64, gain: f64 },
    /// Ignore the norm entirely.
    Constant { value: f64 },
}

impl OpacityCurve {
    pub fn apply(&self, norm: f64) -> f64 {
        match *self {
            OpacityCurve::Tanh => norm.tanh(),
            OpacityCurve::Sigmoid => sigmoid(norm),
            OpacityCurve::ScaledSigmoid { scale, gain } => scale * sigmoid(gain * norm),
            OpacityCurve::Constant { value } => value,
        }
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Propagation direction, temporal frequency and amplitude of a plane wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneWave {
    pub direction: DVec3,
    pub frequency: f64,
    pub amplitude: f64,
}

impl Default for PlaneWave {
    fn default() -> Self {
        Self {
            direction: RIGHT,
            frequency: 0.25,
            amplitude: 1.0,
        }
    }
}

/// Everything needed to build a [`WaveIntoMedium`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub interface: Interface,
    pub medium: Medium,
    pub wave: PlaneWave,
    pub opacity: OpacityCurve,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            interface: Interface::default(),
            medium: Medium::default(),
            wave: PlaneWave::default(),
            opacity: OpacityCurve::Tanh,
        }
    }
}

impl WaveParams {
    /// A rightward wave hitting a diagonal medium at half the speed.
    pub fn angled_medium() -> Self {
        Self {
            interface: Interface::default(),
            medium: Medium::new(1.0, 2.0),
            wave: PlaneWave {
                direction: RIGHT,
                frequency: 0.5,
                amplitude: 0.5,
            },
            opacity: OpacityCurve::Sigmoid,
        }
    }

    pub fn validate(&self) -> OpticsResult<()> {
        self.interface.validate()?;
        self.medium.validate()?;
        if self.wave.direction.length_squared() == 0.0 || !self.wave.direction.is_finite() {
            return Err(OpticsError::InvalidParameter(
                "propagation direction must be a nonzero vector".into(),
            ));
        }
        if self.wave.frequency == 0.0 || !self.wave.frequency.is_finite() {
            return Err(OpticsError::InvalidParameter(format!(
                "frequency must be finite and nonzero, got {}",
                self.wave.frequency
            )));
        }
        if !self.wave.amplitude.is_finite() {
            return Err(OpticsError::InvalidParameter(
                "amplitude must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// A plane wave crossing a planar interface into a medium of higher index.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveIntoMedium {
    interface: Interface,
    medium: Medium,
    wave: PlaneWave,
    opacity: OpacityCurve,
}

impl WaveIntoMedium {
    /// Build a field from validated parameters.
    ///
    /// The interface normal and propagation direction are normalized here.
    pub fn new(params: WaveParams) -> OpticsResult<Self> {
        params.validate()?;
        let interface = Interface::new(params.interface.origin, params.interface.normal);
        let wave = PlaneWave {
            direction: params.wave.direction.normalize(),
            ..params.wave
        };
        log::debug!(
            "wave field: k = {:.4}, index = {}, normal = {:?}",
            params.medium.wavenumber(wave.frequency),
            params.medium.index,
            interface.normal
        );
        Ok(Self {
            interface,
            medium: params.medium,
            wave,
            opacity: params.opacity,
        })
    }

    pub fn params(&self) -> WaveParams {
        WaveParams {
            interface: self.interface,
            medium: self.medium,
            wave: self.wave,
            opacity: self.opacity,
        }
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    pub fn amplitude(&self) -> f64 {
        self.wave.amplitude
    }

    /// Base wavenumber `f / c`.
    pub fn wavenumber(&self) -> f64 {
        self.medium.wavenumber(self.wave.frequency)
    }

    /// Wavelength before the interface.
    pub fn wavelength(&self) -> f64 {
        self.medium.wavelength(self.wave.frequency)
    }

    /// Wavelength inside the second medium.
    pub fn wavelength_in_medium(&self) -> f64 {
        self.medium.speed_in_medium() / self.wave.frequency
    }

    /// Penetration depth past the interface, zero on the near side.
    #[inline]
    pub fn kickback(&self, point: DVec3) -> f64 {
        self.interface.depth(point).max(0.0)
    }

    /// Phase the second medium adds at `point`.
    #[inline]
    pub fn kickback_phase(&self, point: DVec3) -> f64 {
        self.kickback(point) * self.medium.index * self.medium.c
    }

    /// Phase of the undisturbed plane wave at `point` and `time`.
    #[inline]
    pub fn base_phase(&self, point: DVec3, time: f64) -> f64 {
        TAU * (self.wavenumber() * point.dot(self.wave.direction) - self.wave.frequency * time)
    }

    pub fn phase_at(&self, point: DVec3, time: f64) -> f64 {
        self.base_phase(point, time) + self.kickback_phase(point)
    }

    pub fn phases(&self, points: &[DVec3], time: f64) -> Vec<f64> {
        points.iter().map(|&p| self.phase_at(p, time)).collect()
    }

    /// Field vectors `amplitude · cos(phase) · OUT` for every point.
    pub fn phase_field(&self, points: &[DVec3], time: f64) -> Vec<DVec3> {
        points.iter().map(|&p| self.vector_at(p, time)).collect()
    }

    /// Opacity of a field vector, through the configured curve.
    #[inline]
    pub fn opacity_of(&self, vector: DVec3) -> f64 {
        self.opacity.apply(vector.length())
    }

    pub fn opacities(&self, points: &[DVec3], time: f64) -> Vec<f64> {
        points
            .iter()
            .map(|&p| self.opacity_of(self.vector_at(p, time)))
            .collect()
    }

    /// Dot-cloud opacity of a field vector: `max_opacity · tanh(v.z − offset · amplitude)`.
    ///
    /// Clamped to [0, 1] so troughs read as fully transparent.
    pub fn dot_opacity(&self, vector: DVec3, offset: f64, max_opacity: f64) -> f64 {
        (max_opacity * (vector.z - offset * self.wave.amplitude).tanh()).clamp(0.0, 1.0)
    }

    pub fn dot_opacities(
        &self,
        points: &[DVec3],
        time: f64,
        offset: f64,
        max_opacity: f64,
    ) -> Vec<f64> {
        points
            .iter()
            .map(|&p| self.dot_opacity(self.vector_at(p, time), offset, max_opacity))
            .collect()
    }
}

impl PhaseField for WaveIntoMedium {
    fn vector_at(&self, point: DVec3, time: f64) -> DVec3 {
        self.wave.amplitude * self.phase_at(point, time).cos() * OUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refrax_math::{DR, ORIGIN, UP};

    fn straight_interface() -> WaveIntoMedium {
        WaveIntoMedium::new(WaveParams {
            interface: Interface::new(ORIGIN, RIGHT),
            medium: Medium::new(2.0, 1.5),
            wave: PlaneWave {
                direction: RIGHT,
                frequency: 0.25,
                amplitude: 1.0,
            },
            opacity: OpacityCurve::Tanh,
        })
        .unwrap()
    }

    #[test]
    fn test_near_side_phase_has_no_kickback() {
        let wave = straight_interface();
        let k = 0.25 / 2.0;

        for point in [
            DVec3::new(-3.0, 0.0, 0.0),
            DVec3::new(-0.5, 2.0, 0.0),
            DVec3::new(0.0, -4.0, 0.0),
        ] {
            let expected = TAU * k * point.dot(RIGHT);
            assert_eq!(wave.kickback(point), 0.0);
            assert!((wave.phase_at(point, 0.0) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_kickback_grows_with_depth() {
        let wave = straight_interface();

        let depths = [0.1, 0.5, 1.0, 2.5, 7.0];
        let added: Vec<f64> = depths
            .iter()
            .map(|&d| {
                let p = DVec3::new(d, 1.0, 0.0);
                wave.phase_at(p, 0.0) - wave.base_phase(p, 0.0)
            })
            .collect();

        assert!(added.iter().all(|&a| a > 0.0));
        assert!(added.windows(2).all(|w| w[1] > w[0]));
        // Linear in depth with slope index · c
        assert!((added[2] - 1.0 * 1.5 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_advances_with_time() {
        let wave = straight_interface();
        let p = DVec3::new(-1.0, 0.0, 0.0);

        let dt = 0.3;
        let delta = wave.phase_at(p, 0.0) - wave.phase_at(p, dt);
        assert!((delta - TAU * 0.25 * dt).abs() < 1e-12);
    }

    #[test]
    fn test_phase_field_points_out() {
        let wave = straight_interface();
        let points = [DVec3::new(-1.0, 0.0, 0.0), DVec3::new(2.0, 3.0, 0.0)];

        let vectors = wave.phase_field(&points, 1.7);
        assert_eq!(vectors.len(), 2);
        for (v, p) in vectors.iter().zip(points) {
            assert_eq!(v.x, 0.0);
            assert_eq!(v.y, 0.0);
            assert!((v.z - wave.phase_at(p, 1.7).cos()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_phase_field_is_deterministic() {
        let wave = WaveIntoMedium::new(WaveParams::angled_medium()).unwrap();
        let points: Vec<DVec3> = (0..50)
            .map(|i| DVec3::new(i as f64 * 0.2 - 5.0, (i % 7) as f64 - 3.0, 0.0))
            .collect();

        assert_eq!(wave.phase_field(&points, 2.0), wave.phase_field(&points, 2.0));
        assert!(wave.phase_field(&[], 2.0).is_empty());
    }

    #[test]
    fn test_construction_normalizes_directions() {
        let wave = WaveIntoMedium::new(WaveParams {
            interface: Interface {
                origin: ORIGIN,
                normal: DR,
            },
            wave: PlaneWave {
                direction: RIGHT * 4.0,
                ..PlaneWave::default()
            },
            ..WaveParams::default()
        })
        .unwrap();

        let params = wave.params();
        assert!((params.interface.normal.length() - 1.0).abs() < 1e-12);
        assert_eq!(params.wave.direction, RIGHT);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let zero_speed = WaveParams {
            medium: Medium::new(0.0, 1.5),
            ..WaveParams::default()
        };
        assert!(WaveIntoMedium::new(zero_speed).is_err());

        let zero_index = WaveParams {
            medium: Medium::new(1.0, 0.0),
            ..WaveParams::default()
        };
        assert!(WaveIntoMedium::new(zero_index).is_err());

        let no_direction = WaveParams {
            wave: PlaneWave {
                direction: DVec3::ZERO,
                ..PlaneWave::default()
            },
            ..WaveParams::default()
        };
        assert!(WaveIntoMedium::new(no_direction).is_err());

        // A standing field has no wavelength
        let frozen = WaveParams {
            wave: PlaneWave {
                frequency: 0.0,
                ..PlaneWave::default()
            },
            ..WaveParams::default()
        };
        assert!(matches!(
            WaveIntoMedium::new(frozen),
            Err(OpticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_wavelengths() {
        let params = WaveParams {
            medium: Medium::new(1.0, 2.0),
            wave: PlaneWave {
                frequency: 0.5,
                ..PlaneWave::default()
            },
            ..WaveParams::default()
        };
        let wave = WaveIntoMedium::new(params).unwrap();
        assert_eq!(wave.wavelength(), 2.0);
        assert_eq!(wave.wavelength_in_medium(), 1.0);
    }

    #[test]
    fn test_opacity_curves() {
        assert_eq!(OpacityCurve::Tanh.apply(0.0), 0.0);
        assert_eq!(OpacityCurve::Sigmoid.apply(0.0), 0.5);
        let scaled = OpacityCurve::ScaledSigmoid { scale: 0.5, gain: 2.0 };
        assert!((scaled.apply(1.0) - 0.5 * sigmoid(2.0)).abs() < 1e-12);
        assert_eq!(OpacityCurve::Constant { value: 0.3 }.apply(9.0), 0.3);
    }

    #[test]
    fn test_opacities_follow_curve() {
        let wave = straight_interface();
        let points = [DVec3::new(-1.0, 0.0, 0.0), UP];

        let opacities = wave.opacities(&points, 0.0);
        for (o, p) in opacities.iter().zip(points) {
            let norm = wave.vector_at(p, 0.0).length();
            assert!((o - norm.tanh()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dot_opacity_clamped() {
        let wave = straight_interface();

        assert_eq!(wave.dot_opacity(DVec3::new(0.0, 0.0, -1.0), 0.2, 1.0), 0.0);
        let crest = wave.dot_opacity(DVec3::new(0.0, 0.0, 1.0), 0.2, 1.0);
        assert!((crest - 0.8f64.tanh()).abs() < 1e-12);
        assert!(wave.dot_opacity(OUT * 50.0, 0.0, 3.0) <= 1.0);
    }

    #[test]
    fn test_opacity_curve_serde() {
        let json = serde_json::to_string(&OpacityCurve::ScaledSigmoid { scale: 0.5, gain: 2.0 })
            .unwrap();
        assert_eq!(json, r#"{"kind":"scaled_sigmoid","scale":0.5,"gain":2.0}"#);

        let back: OpacityCurve = serde_json::from_str(r#"{"kind":"tanh"}"#).unwrap();
        assert_eq!(back, OpacityCurve::Tanh);
    }
}
