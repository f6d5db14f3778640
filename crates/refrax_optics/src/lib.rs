//! Refrax optics - wave refraction and prism dispersion.
//!
//! This crate provides:
//!
//! - **Phase fields**: `WaveIntoMedium`, a plane wave whose phase is kicked back
//!   inside a denser medium, and `TimeVaryingField` to sample it per frame
//! - **Ray optics**: Snell's law at one interface and the two-refraction trace
//!   through a prism, swept over a range of indices to produce a spectrum
//! - **Scene config**: JSON scene files with defaults for every value
//!
//! # Example
//!
//! ```
//! use refrax_optics::{refract_through_prism, Prism};
//! use refrax_optics::math::{Ray, LEFT_SIDE, ORIGIN};
//!
//! let prism = Prism::equilateral(4.0, ORIGIN);
//! let beam = Ray::through(LEFT_SIDE, prism.entry_edge().center());
//! let fan = refract_through_prism(1.3, 1.4, 200, &beam, &prism.entry_edge(), &prism.exit_edge())?;
//! assert_eq!(fan.len(), 200);
//! # Ok::<(), refrax_optics::OpticsError>(())
//! ```

pub mod config;
pub mod crossing;
pub mod error;
pub mod field;
pub mod grid;
pub mod medium;
pub mod prism;
pub mod snell;
pub mod spectrum;
pub mod wave;

pub use refrax_math as math;

// Re-export commonly used types
pub use config::{ConfigError, PrismParams, RenderSettings, SceneConfig};
pub use error::{OpticsError, OpticsResult, Surface};
pub use field::{PhaseField, TimeVaryingField};
pub use grid::GridParams;
pub use medium::{Interface, Medium};
pub use prism::{
    refract_through_prism, refract_through_prism_each, refract_through_prism_with, trace_beam,
    trace_path, Beam, Edge, Prism, PrismPath, TraceOptions,
};
pub use spectrum::{spectral_color, Color};
pub use wave::{OpacityCurve, PlaneWave, WaveIntoMedium, WaveParams};
