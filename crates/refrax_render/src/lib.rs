//! Refrax renderer - CPU rasterization of wave fields and beam fans.
//!
//! Wave frames are shaded per pixel in parallel buckets, or drawn as a dot
//! cloud; beams, prism edges and interfaces are filled as `vello_cpu` paths
//! on top. Output is a linear RGB [`ImageBuffer`] that can be saved as PNG.

mod bucket;
mod draw;
mod error;
mod mask;
mod renderer;
mod scene;
mod viewport;

pub use bucket::{
    generate_buckets, render_bucket, render_wave_frame, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use draw::{
    draw_beams, draw_polyline, draw_prism, draw_segment, fill_dots, fill_triangle, Blend, Stroke,
};
pub use error::{RenderError, RenderResult};
pub use renderer::{
    clamp_01, color_to_rgba, linear_to_gamma, shade_pixel, vector_opacity, wave_opacity,
    ImageBuffer, WaveShading, WaveStyle,
};
pub use scene::{beam_bounds, render_dot_cloud, render_prism_scene, render_wave_scene, DOT_LEVELS};
pub use viewport::Viewport;

/// Re-export the color type from refrax_optics
pub use refrax_optics::Color;
