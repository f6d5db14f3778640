//! Scene configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "wave": { "medium": { "c": 1.0, "index": 2.0 } },
//!   "prism": { "n_beams": 64 }
//! }
//! ```

use std::fs;
use std::path::Path;

use refrax_math::{DVec3, Interval, Ray, LEFT_SIDE, ORIGIN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::OpticsError;
use crate::grid::GridParams;
use crate::prism::{Prism, TraceOptions};
use crate::spectrum::Color;
use crate::wave::WaveParams;

/// Errors that can occur while loading a scene config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] OpticsError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Prism, incoming beam and index sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismParams {
    pub min_index: f64,
    pub max_index: f64,
    pub n_beams: usize,
    /// Height of the equilateral prism
    pub height: f64,
    pub center: DVec3,
    /// Where the incoming beam starts
    pub beam_start: DVec3,
    /// Where along the entry edge the beam is aimed, 0 at the apex
    pub entry_alpha: f64,
    pub trace: TraceOptions,
}

impl Default for PrismParams {
    fn default() -> Self {
        Self {
            min_index: 1.3,
            max_index: 1.4,
            n_beams: 200,
            height: 4.0,
            center: ORIGIN,
            beam_start: LEFT_SIDE,
            entry_alpha: 0.5,
            trace: TraceOptions::default(),
        }
    }
}

impl PrismParams {
    pub fn prism(&self) -> Prism {
        Prism::equilateral(self.height, self.center)
    }

    pub fn indices(&self) -> Interval {
        Interval::new(self.min_index, self.max_index)
    }

    /// Incoming beam from `beam_start` toward the aim point on the entry edge.
    pub fn incidence(&self) -> Ray {
        let target = self.prism().entry_edge().point_at(self.entry_alpha);
        Ray::through(self.beam_start, target)
    }

    pub fn validate(&self) -> Result<(), OpticsError> {
        if self.n_beams == 0 {
            return Err(OpticsError::InvalidParameter("n_beams must be positive".into()));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(OpticsError::InvalidParameter(format!(
                "prism height must be positive, got {}",
                self.height
            )));
        }
        if self.min_index > self.max_index {
            return Err(OpticsError::InvalidParameter(format!(
                "min_index {} exceeds max_index {}",
                self.min_index, self.max_index
            )));
        }
        if self.min_index == self.max_index && self.n_beams > 1 {
            log::warn!(
                "index range is a single value {}; all {} beams will overlap",
                self.min_index,
                self.n_beams
            );
        }
        Ok(())
    }
}

/// Output image settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// World units visible vertically
    pub frame_height: f64,
    /// World point at the middle of the image
    pub center: DVec3,
    pub background: Color,
    pub wave_color: Color,
    /// Dot-cloud mode: subtracted from crests before the tanh
    pub dot_offset: f64,
    pub max_opacity: f64,
    /// Beam stroke width in pixels
    pub beam_width: f64,
    /// Additive weight of each beam; overlapping beams sum toward white
    pub beam_opacity: f64,
    pub fps: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            frame_height: 8.0,
            center: ORIGIN,
            background: Color::ZERO,
            wave_color: Color::ONE,
            dot_offset: 0.2,
            max_opacity: 1.0,
            beam_width: 1.0,
            beam_opacity: 0.3,
            fps: 30.0,
        }
    }
}

/// A complete scene description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub wave: WaveParams,
    pub grid: GridParams,
    pub prism: PrismParams,
    pub render: RenderSettings,
}

impl SceneConfig {
    /// Read and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config JSON.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), OpticsError> {
        self.wave.validate()?;
        self.prism.validate()?;
        if self.render.width == 0 || self.render.height == 0 {
            return Err(OpticsError::InvalidParameter(
                "render resolution must be nonzero".into(),
            ));
        }
        if self.render.width > u32::from(u16::MAX) || self.render.height > u32::from(u16::MAX) {
            return Err(OpticsError::InvalidParameter(format!(
                "render resolution {}x{} is larger than {} on a side",
                self.render.width,
                self.render.height,
                u16::MAX
            )));
        }
        if !self.render.fps.is_finite() || self.render.fps <= 0.0 {
            return Err(OpticsError::InvalidParameter(format!(
                "fps must be positive, got {}",
                self.render.fps
            )));
        }
        Ok(())
    }
}
