//! Frame buffer and per-pixel wave shading.
//!
//! Colors are kept in linear RGB and gamma-encoded only when converted to
//! bytes.

use std::path::Path;

use refrax_math::DVec3;
use refrax_optics::{Color, PhaseField, RenderSettings, WaveIntoMedium};

use crate::error::{RenderError, RenderResult};

/// How a wave field turns into pixel opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveShading {
    /// Opacity from the length of the field vector, through the field's curve
    Field,
    /// Crests only: `max_opacity · tanh(v.z − offset · amplitude)`
    Dots { offset: f64, max_opacity: f64 },
}

/// Colors and shading mode for a wave frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveStyle {
    pub background: Color,
    pub color: Color,
    pub shading: WaveShading,
}

impl WaveStyle {
    /// Field shading with the colors from `settings`.
    pub fn field(settings: &RenderSettings) -> Self {
        Self {
            background: settings.background,
            color: settings.wave_color,
            shading: WaveShading::Field,
        }
    }

    /// Dot-cloud shading with the colors and offsets from `settings`.
    pub fn dots(settings: &RenderSettings) -> Self {
        Self {
            background: settings.background,
            color: settings.wave_color,
            shading: WaveShading::Dots {
                offset: settings.dot_offset,
                max_opacity: settings.max_opacity,
            },
        }
    }
}

impl Default for WaveStyle {
    fn default() -> Self {
        Self::field(&RenderSettings::default())
    }
}

/// Opacity of the wave at `point` and `time`, in [0, 1].
pub fn wave_opacity(wave: &WaveIntoMedium, point: DVec3, time: f64, shading: WaveShading) -> f64 {
    vector_opacity(wave, wave.vector_at(point, time), shading)
}

/// Opacity of an already sampled field vector, in [0, 1].
pub fn vector_opacity(wave: &WaveIntoMedium, vector: DVec3, shading: WaveShading) -> f64 {
    let opacity = match shading {
        WaveShading::Field => wave.opacity_of(vector),
        WaveShading::Dots {
            offset,
            max_opacity,
        } => wave.dot_opacity(vector, offset, max_opacity),
    };
    clamp_01(opacity)
}

/// Color of a single pixel: the wave color over the background.
pub fn shade_pixel(wave: &WaveIntoMedium, point: DVec3, time: f64, style: &WaveStyle) -> Color {
    let alpha = wave_opacity(wave, point, time, style.shading);
    style.background.lerp(style.color, alpha)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))).round() as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))).round() as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))).round() as u8;
    [r, g, b, 255]
}

/// Linear RGB image, row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::ZERO)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// True if (x, y) is inside the image.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.offset(x, y);
        self.pixels[i] = color;
    }

    /// Composite `color` over the pixel with coverage `alpha`.
    ///
    /// Out-of-bounds coordinates are ignored.
    pub fn blend_over(&mut self, x: i64, y: i64, color: Color, alpha: f64) {
        if !self.contains(x, y) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.pixels[i] = self.pixels[i].lerp(color, clamp_01(alpha));
    }

    /// Add `color · alpha` to the pixel. Out-of-bounds coordinates are ignored.
    pub fn add(&mut self, x: i64, y: i64, color: Color, alpha: f64) {
        if !self.contains(x, y) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.pixels[i] += color * clamp_01(alpha);
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write the image as a PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let bytes = self.to_rgba();
        let len = bytes.len();
        let img = image::RgbaImage::from_raw(self.width, self.height, bytes).ok_or(
            RenderError::InvalidBuffer {
                width: self.width,
                height: self.height,
                len,
            },
        )?;
        img.save(path)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
