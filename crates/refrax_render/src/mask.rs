//! Coverage masks rasterized with `vello_cpu`.
//!
//! A path is filled in opaque white on a transparent pixmap; the alpha channel
//! is then the per-pixel coverage, which is composited into the linear
//! [`ImageBuffer`] with whatever color and blend the caller wants.

use refrax_optics::Color;
use vello_cpu::kurbo::{Affine, BezPath};

use crate::draw::Blend;
use crate::error::{RenderError, RenderResult};
use crate::renderer::ImageBuffer;

/// 8-bit anti-aliased coverage of one filled path, row-major.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CoverageMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl CoverageMask {
    /// Fill `path` (pixel coordinates, y down) with the nonzero rule.
    pub(crate) fn rasterize(width: u32, height: u32, path: &BezPath) -> RenderResult<Self> {
        let too_large = || RenderError::TooLarge { width, height };
        let width_u16: u16 = width.try_into().map_err(|_| too_large())?;
        let height_u16: u16 = height.try_into().map_err(|_| too_large())?;

        let pixel_count = width as usize * height as usize;
        if pixel_count == 0 || path.elements().is_empty() {
            return Ok(Self {
                width,
                height,
                alpha: vec![0; pixel_count],
            });
        }

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_transform(Affine::IDENTITY);
        ctx.set_paint_transform(Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(path);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);

        // Premultiplied white: every channel equals coverage, alpha is enough
        let alpha = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Coverage in [0, 1] at pixel (x, y); zero outside the mask.
    #[cfg(test)]
    pub(crate) fn coverage(&self, x: u32, y: u32) -> f64 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        f64::from(self.alpha[(y * self.width + x) as usize]) / 255.0
    }

    /// Blend `color` into `image` wherever the mask has coverage.
    pub(crate) fn composite(
        &self,
        image: &mut ImageBuffer,
        color: Color,
        opacity: f64,
        blend: Blend,
    ) {
        for (index, &a) in self.alpha.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let x = (index as u32 % self.width) as i64;
            let y = (index as u32 / self.width) as i64;
            let alpha = f64::from(a) / 255.0 * opacity;
            match blend {
                Blend::Over => image.blend_over(x, y, color, alpha),
                Blend::Add => image.add(x, y, color, alpha),
            }
        }
    }
}
