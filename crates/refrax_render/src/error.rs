//! Render error types.

use refrax_optics::OpticsError;
use thiserror::Error;

/// Errors that can occur while rendering or saving a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Optics error: {0}")]
    Optics(#[from] OpticsError),

    #[error("Buffer of {len} bytes does not fit a {width}x{height} image")]
    InvalidBuffer { width: u32, height: u32, len: usize },

    #[error("{width}x{height} exceeds the rasterizer's 65535 pixel limit")]
    TooLarge { width: u32, height: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;
