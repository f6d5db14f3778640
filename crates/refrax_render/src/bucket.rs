//! Bucket-based tile rendering of wave frames.
//!
//! Divides the image into tiles (buckets) that are shaded independently and
//! in parallel using rayon, then copied into the frame in a fixed order.

use rayon::prelude::*;
use refrax_optics::{Color, WaveIntoMedium};

use crate::renderer::{shade_pixel, ImageBuffer, WaveStyle};
use crate::viewport::Viewport;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
///
/// The sort is stable, so equidistant buckets keep row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let dist = |b: &Bucket| {
        let cx = b.x as f64 + b.width as f64 / 2.0;
        let cy = b.y as f64 + b.height as f64 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy these pixels into their place in `image`.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let b = &self.bucket;
        for (i, color) in self.pixels.iter().enumerate() {
            let local_x = i as u32 % b.width;
            let local_y = i as u32 / b.width;
            image.set(b.x + local_x, b.y + local_y, *color);
        }
    }
}

/// Shade a single bucket of the wave frame.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    wave: &WaveIntoMedium,
    time: f64,
    viewport: &Viewport,
    style: &WaveStyle,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let point = viewport.pixel_to_world(bucket.x + local_x, bucket.y + local_y);
            pixels.push(shade_pixel(wave, point, time, style));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render the wave field at `time` over the whole viewport.
pub fn render_wave_frame(
    wave: &WaveIntoMedium,
    time: f64,
    viewport: &Viewport,
    style: &WaveStyle,
) -> ImageBuffer {
    let buckets = generate_buckets(
        viewport.image_width,
        viewport.image_height,
        DEFAULT_BUCKET_SIZE,
    );
    log::debug!(
        "rendering wave frame t = {:.3} in {} buckets",
        time,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, wave, time, viewport, style))
        .collect();

    let mut image = ImageBuffer::filled(
        viewport.image_width,
        viewport.image_height,
        style.background,
    );
    for result in &results {
        result.write_into(&mut image);
    }
    image
}
