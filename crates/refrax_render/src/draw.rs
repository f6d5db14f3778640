//! Vector drawing on top of rendered frames.
//!
//! Strokes, triangles and dots are built as `kurbo` paths in pixel space and
//! filled by `vello_cpu` into a coverage mask, which is then blended into the
//! linear [`ImageBuffer`]. A stroke is the union of one quad per segment, so
//! the joints of a polyline are not covered twice.

use rayon::prelude::*;
use refrax_math::DVec3;
use refrax_optics::{Beam, Color, Prism};
use vello_cpu::kurbo::{BezPath, Circle, Point, Shape, Vec2};

use crate::error::RenderResult;
use crate::mask::CoverageMask;
use crate::renderer::ImageBuffer;
use crate::viewport::Viewport;

/// Beams rasterized concurrently before they are added into the image.
const BEAM_BATCH: usize = 16;

/// Flattening tolerance for circles, in pixels.
const CIRCLE_TOLERANCE: f64 = 0.1;

/// How stroke coverage combines with what is already in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Composite over the existing pixel
    #[default]
    Over,
    /// Add light, for overlapping beams
    Add,
}

/// Stroke parameters for [`draw_segment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Width in pixels
    pub width: f64,
    /// Scales coverage
    pub opacity: f64,
    pub blend: Blend,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
            blend: Blend::Over,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }
}

fn to_point(viewport: &Viewport, p: DVec3) -> Point {
    let (x, y) = viewport.world_to_pixel(p);
    Point::new(x, y)
}

/// Append the quad covering `a`-`b` at `width` pixels to `path`.
///
/// Degenerate or non-finite segments add nothing.
fn push_segment(path: &mut BezPath, a: Point, b: Point, width: f64) {
    let d = b - a;
    let length = d.hypot();
    if length < 1e-9 || !length.is_finite() {
        return;
    }
    let offset = Vec2::new(-d.y, d.x) * (0.5 * width.max(0.0) / length);

    path.move_to(a + offset);
    path.line_to(b + offset);
    path.line_to(b - offset);
    path.line_to(a - offset);
    path.close_path();
}

fn stroke_path(viewport: &Viewport, points: &[DVec3], width: f64) -> BezPath {
    let mut path = BezPath::new();
    for pair in points.windows(2) {
        push_segment(
            &mut path,
            to_point(viewport, pair[0]),
            to_point(viewport, pair[1]),
            width,
        );
    }
    path
}

fn fill_mask(image: &ImageBuffer, path: &BezPath) -> RenderResult<CoverageMask> {
    CoverageMask::rasterize(image.width, image.height, path)
}

/// Draw a world-space segment with an anti-aliased stroke.
pub fn draw_segment(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    start: DVec3,
    end: DVec3,
    stroke: &Stroke,
) -> RenderResult<()> {
    draw_polyline(image, viewport, &[start, end], stroke)
}

/// Draw a polyline through `points`.
pub fn draw_polyline(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    points: &[DVec3],
    stroke: &Stroke,
) -> RenderResult<()> {
    let path = stroke_path(viewport, points, stroke.width);
    if path.elements().is_empty() {
        return Ok(());
    }
    fill_mask(image, &path)?.composite(image, stroke.color, stroke.opacity, stroke.blend);
    Ok(())
}

/// Additively draw every beam in its own color.
///
/// Masks are rasterized in parallel batches and added in beam order, so the
/// result does not depend on scheduling.
pub fn draw_beams(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    beams: &[Beam],
    width_px: f64,
    opacity: f64,
) -> RenderResult<()> {
    let (width, height) = (image.width, image.height);
    for batch in beams.chunks(BEAM_BATCH) {
        let masks: Vec<RenderResult<CoverageMask>> = batch
            .par_iter()
            .map(|beam| {
                let path = stroke_path(viewport, &beam.points, width_px);
                CoverageMask::rasterize(width, height, &path)
            })
            .collect();

        for (beam, mask) in batch.iter().zip(masks) {
            mask?.composite(image, beam.color, opacity, Blend::Add);
        }
    }
    Ok(())
}

/// Fill a triangle, compositing `color` over it.
pub fn fill_triangle(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    vertices: [DVec3; 3],
    color: Color,
    opacity: f64,
) -> RenderResult<()> {
    let [a, b, c] = vertices.map(|v| to_point(viewport, v));
    let mut path = BezPath::new();
    path.move_to(a);
    path.line_to(b);
    path.line_to(c);
    path.close_path();

    fill_mask(image, &path)?.composite(image, color, opacity, Blend::Over);
    Ok(())
}

/// Fill a disc of `radius` world units around each of `centers`, all in one
/// mask so overlapping dots do not stack.
pub fn fill_dots(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    centers: &[DVec3],
    radius: f64,
    color: Color,
    opacity: f64,
) -> RenderResult<()> {
    let radius_px = radius * viewport.pixels_per_unit();
    if centers.is_empty() || radius_px <= 0.0 || !radius_px.is_finite() {
        return Ok(());
    }

    let mut path = BezPath::new();
    for &center in centers {
        let circle = Circle::new(to_point(viewport, center), radius_px);
        path.extend(circle.path_elements(CIRCLE_TOLERANCE));
    }

    fill_mask(image, &path)?.composite(image, color, opacity, Blend::Over);
    Ok(())
}

/// Fill and outline a prism.
pub fn draw_prism(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    prism: &Prism,
    fill: Color,
    fill_opacity: f64,
    outline: &Stroke,
) -> RenderResult<()> {
    fill_triangle(image, viewport, prism.vertices, fill, fill_opacity)?;
    for edge in prism.edges() {
        draw_segment(image, viewport, edge.start, edge.end, outline)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refrax_math::ORIGIN;

    fn viewport() -> Viewport {
        // One world unit per 10 pixels, origin at pixel (50, 50)
        Viewport::new()
            .with_resolution(100, 100)
            .with_frame_height(10.0)
    }

    #[test]
    fn test_horizontal_segment_coverage() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);
        let stroke = Stroke::new(Color::ONE, 1.0);

        // World y = 0.05 puts the stroke exactly over pixel row 49
        let y = 0.05;
        draw_segment(
            &mut image,
            &viewport,
            DVec3::new(-2.0, y, 0.0),
            DVec3::new(2.0, y, 0.0),
            &stroke,
        )
        .unwrap();

        assert!(image.get(50, 49).x > 0.99);
        assert_eq!(image.get(50, 47), Color::ZERO);
        assert_eq!(image.get(50, 51), Color::ZERO);
        // Past the end
        assert_eq!(image.get(80, 49), Color::ZERO);
    }

    #[test]
    fn test_steep_segment_is_continuous() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);
        let stroke = Stroke::new(Color::ONE, 1.0);

        draw_segment(
            &mut image,
            &viewport,
            DVec3::new(0.0, -3.0, 0.0),
            DVec3::new(1.0, 3.0, 0.0),
            &stroke,
        )
        .unwrap();

        // Every row the segment spans has some ink
        for y in 25..75 {
            let row_sum: f64 = (0..100).map(|x| image.get(x, y).x).sum();
            assert!(row_sum > 0.5, "row {y} has coverage {row_sum}");
        }
    }

    #[test]
    fn test_offscreen_segment_is_clipped() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);
        let stroke = Stroke::new(Color::ONE, 3.0);

        draw_segment(
            &mut image,
            &viewport,
            DVec3::new(-100.0, -100.0, 0.0),
            DVec3::new(100.0, 100.0, 0.0),
            &stroke,
        )
        .unwrap();
        draw_segment(&mut image, &viewport, ORIGIN, ORIGIN, &stroke).unwrap();

        assert!(image.get(50, 50).x > 0.0);
    }

    #[test]
    fn test_polyline_joint_not_doubled() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);
        let stroke = Stroke::new(Color::ONE, 2.0)
            .with_opacity(0.5)
            .with_blend(Blend::Add);

        // A right angle at the origin; the corner pixel lies in both quads
        draw_polyline(
            &mut image,
            &viewport,
            &[
                DVec3::new(-2.0, 0.0, 0.0),
                ORIGIN,
                DVec3::new(0.0, 2.0, 0.0),
            ],
            &stroke,
        )
        .unwrap();

        let corner = image.get(49, 49).x;
        assert!(corner > 0.45 && corner < 0.55, "corner {corner}");
    }

    #[test]
    fn test_additive_beams_accumulate() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);
        let y = 0.05;
        let beam = |color: Color| Beam {
            index: 1.3,
            alpha: 0.0,
            color,
            points: [
                DVec3::new(-4.0, y, 0.0),
                DVec3::new(-1.0, y, 0.0),
                DVec3::new(1.0, y, 0.0),
                DVec3::new(4.0, y, 0.0),
            ],
            exit_direction: DVec3::X,
        };
        let beams = [
            beam(Color::new(1.0, 0.0, 0.0)),
            beam(Color::new(0.0, 0.0, 1.0)),
        ];

        draw_beams(&mut image, &viewport, &beams, 1.0, 0.5).unwrap();

        let pixel = image.get(30, 49);
        assert!((pixel.x - 0.5).abs() < 1e-2);
        assert!((pixel.z - 0.5).abs() < 1e-2);
        assert_eq!(pixel.y, 0.0);
    }

    #[test]
    fn test_many_beams_keep_order_across_batches() {
        let viewport = viewport();
        let beams: Vec<Beam> = (0..40)
            .map(|i| Beam {
                index: 1.3,
                alpha: i as f64 / 39.0,
                color: Color::new(0.01, 0.0, 0.0),
                points: [
                    DVec3::new(-4.0, 0.05, 0.0),
                    DVec3::new(-1.0, 0.05, 0.0),
                    DVec3::new(1.0, 0.05, 0.0),
                    DVec3::new(4.0, 0.05, 0.0),
                ],
                exit_direction: DVec3::X,
            })
            .collect();

        let mut first = ImageBuffer::new(100, 100);
        let mut second = ImageBuffer::new(100, 100);
        draw_beams(&mut first, &viewport, &beams, 1.0, 1.0).unwrap();
        draw_beams(&mut second, &viewport, &beams, 1.0, 1.0).unwrap();

        assert_eq!(first, second);
        assert!((first.get(30, 49).x - 0.4).abs() < 1e-2);
    }

    #[test]
    fn test_fill_triangle() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);
        let prism = Prism::equilateral(4.0, ORIGIN);

        fill_triangle(&mut image, &viewport, prism.vertices, Color::ONE, 1.0).unwrap();

        // Centroid is inside, corners are not
        let centroid = (prism.vertices[0] + prism.vertices[1] + prism.vertices[2]) / 3.0;
        let (cx, cy) = viewport.world_to_pixel(centroid);
        assert!(image.get(cx as u32, cy as u32).x > 0.99);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.get(99, 99), Color::ZERO);
    }

    #[test]
    fn test_fill_dots() {
        let viewport = viewport();
        let mut image = ImageBuffer::new(100, 100);

        fill_dots(
            &mut image,
            &viewport,
            &[ORIGIN, DVec3::new(3.0, 0.0, 0.0)],
            0.5,
            Color::ONE,
            0.8,
        )
        .unwrap();

        // Dot centers are covered, the gap between them is not
        assert!((image.get(50, 50).x - 0.8).abs() < 1e-2);
        assert!((image.get(80, 50).x - 0.8).abs() < 1e-2);
        assert_eq!(image.get(65, 50), Color::ZERO);
    }
}
