//! Orthographic view of the drawing plane.

use refrax_math::{DVec3, FRAME_HEIGHT, ORIGIN};
use refrax_optics::RenderSettings;

/// Maps world coordinates in the xy plane to image pixels.
///
/// Pixel (0, 0) is the top-left corner; world +y points up the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub image_width: u32,
    pub image_height: u32,

    // World units visible vertically
    frame_height: f64,
    // World point at the image center
    center: DVec3,
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 960,
            image_height: 540,
            frame_height: FRAME_HEIGHT,
            center: ORIGIN,
        }
    }

    /// Viewport matching a scene's render settings.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new()
            .with_resolution(settings.width, settings.height)
            .with_frame_height(settings.frame_height)
            .with_center(settings.center)
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set how many world units fit vertically.
    pub fn with_frame_height(mut self, frame_height: f64) -> Self {
        self.frame_height = frame_height;
        self
    }

    /// Set the world point shown at the image center.
    pub fn with_center(mut self, center: DVec3) -> Self {
        self.center = center;
        self
    }

    pub fn frame_height(&self) -> f64 {
        self.frame_height
    }

    pub fn frame_width(&self) -> f64 {
        self.frame_height * self.image_width as f64 / self.image_height as f64
    }

    /// Pixels per world unit (equal on both axes).
    pub fn pixels_per_unit(&self) -> f64 {
        self.image_height as f64 / self.frame_height
    }

    /// Continuous pixel coordinates of a world point.
    pub fn world_to_pixel(&self, point: DVec3) -> (f64, f64) {
        let scale = self.pixels_per_unit();
        let x = (point.x - self.center.x) * scale + self.image_width as f64 / 2.0;
        let y = self.image_height as f64 / 2.0 - (point.y - self.center.y) * scale;
        (x, y)
    }

    /// World point at the center of pixel (i, j).
    pub fn pixel_to_world(&self, i: u32, j: u32) -> DVec3 {
        let scale = self.pixels_per_unit();
        let x = (i as f64 + 0.5 - self.image_width as f64 / 2.0) / scale + self.center.x;
        let y = (self.image_height as f64 / 2.0 - (j as f64 + 0.5)) / scale + self.center.y;
        DVec3::new(x, y, 0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
