//! Complete frames: a wave crossing an interface, and a prism dispersing a beam.

use std::f64::consts::FRAC_PI_2;

use refrax_math::{rotate_vector, DVec3};
use refrax_optics::{
    Beam, Color, Interface, Prism, RenderSettings, TimeVaryingField, WaveIntoMedium,
};

use crate::bucket::render_wave_frame;
use crate::draw::{draw_beams, draw_prism, draw_segment, fill_dots, Stroke};
use crate::error::RenderResult;
use crate::renderer::{vector_opacity, ImageBuffer, WaveStyle};
use crate::viewport::Viewport;

const INTERFACE_COLOR: Color = Color::new(0.5, 0.5, 0.5);
const PRISM_FILL: Color = Color::new(0.2, 0.2, 0.25);
const PRISM_FILL_OPACITY: f64 = 0.5;
const OUTLINE_COLOR: Color = Color::ONE;

/// Distinct opacities a dot cloud is quantized to; one mask is filled per level.
pub const DOT_LEVELS: usize = 16;

/// Render the wave field and the interface line.
pub fn render_wave_scene(
    wave: &WaveIntoMedium,
    time: f64,
    viewport: &Viewport,
    style: &WaveStyle,
) -> RenderResult<ImageBuffer> {
    let mut image = render_wave_frame(wave, time, viewport, style);
    draw_interface(&mut image, viewport, wave.interface())?;
    Ok(image)
}

/// Render the field's sample points as dots shaded by `style`, plus the
/// interface line.
///
/// Dot opacities are rounded up to one of [`DOT_LEVELS`] steps; dots with
/// zero opacity are skipped.
pub fn render_dot_cloud(
    field: &TimeVaryingField<WaveIntoMedium>,
    viewport: &Viewport,
    style: &WaveStyle,
    radius: f64,
) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::filled(
        viewport.image_width,
        viewport.image_height,
        style.background,
    );

    let mut levels: Vec<Vec<DVec3>> = vec![Vec::new(); DOT_LEVELS];
    for (&point, vector) in field.points().iter().zip(field.sample()) {
        let opacity = vector_opacity(field.field(), vector, style.shading);
        if opacity <= 0.0 {
            continue;
        }
        let level = ((opacity * DOT_LEVELS as f64).ceil() as usize).clamp(1, DOT_LEVELS);
        levels[level - 1].push(point);
    }

    for (i, centers) in levels.iter().enumerate() {
        let opacity = (i + 1) as f64 / DOT_LEVELS as f64;
        fill_dots(&mut image, viewport, centers, radius, style.color, opacity)?;
    }
    log::debug!(
        "drew {} of {} dots",
        levels.iter().map(Vec::len).sum::<usize>(),
        field.points().len()
    );

    draw_interface(&mut image, viewport, field.field().interface())?;
    Ok(image)
}

fn draw_interface(
    image: &mut ImageBuffer,
    viewport: &Viewport,
    interface: &Interface,
) -> RenderResult<()> {
    let along = rotate_vector(interface.normal, FRAC_PI_2);
    // Long enough to cross the whole frame from any origin inside it
    let reach = viewport.frame_width() + viewport.frame_height();
    draw_segment(
        image,
        viewport,
        interface.origin - reach * along,
        interface.origin + reach * along,
        &Stroke::new(INTERFACE_COLOR, 2.0),
    )
}

/// Render the prism and its dispersed beam fan.
pub fn render_prism_scene(
    prism: &Prism,
    beams: &[Beam],
    viewport: &Viewport,
    settings: &RenderSettings,
) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::filled(
        viewport.image_width,
        viewport.image_height,
        settings.background,
    );

    draw_prism(
        &mut image,
        viewport,
        prism,
        PRISM_FILL,
        PRISM_FILL_OPACITY,
        &Stroke::new(OUTLINE_COLOR, 2.0),
    )?;
    draw_beams(
        &mut image,
        viewport,
        beams,
        settings.beam_width,
        settings.beam_opacity,
    )?;
    log::debug!("drew {} beams", beams.len());

    Ok(image)
}

/// World-space bounds of everything a beam fan touches, as (min, max).
pub fn beam_bounds(beams: &[Beam]) -> Option<(DVec3, DVec3)> {
    let mut points = beams.iter().flat_map(|b| b.points.iter().copied());
    let first = points.next()?;
    Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refrax_optics::grid::dot_cloud_grid;
    use refrax_optics::{PrismParams, WaveParams};

    #[test]
    fn test_wave_scene_draws_interface() {
        let wave = WaveIntoMedium::new(WaveParams::default()).unwrap();
        let viewport = Viewport::new().with_resolution(96, 54);
        let style = WaveStyle::default();

        let plain = render_wave_frame(&wave, 0.0, &viewport, &style);
        let scene = render_wave_scene(&wave, 0.0, &viewport, &style).unwrap();

        // The interface passes through the origin, at the image center
        let (x, y) = viewport.world_to_pixel(wave.interface().origin);
        let (x, y) = (x as u32, y as u32);
        assert_ne!(plain.get(x, y), scene.get(x, y));
    }

    #[test]
    fn test_prism_scene_shows_spectrum() {
        let _ = env_logger::builder().is_test(true).try_init();

        let params = PrismParams {
            n_beams: 32,
            ..PrismParams::default()
        };
        let prism = params.prism();
        let beams = refrax_optics::refract_through_prism_with(
            params.indices(),
            params.n_beams,
            &params.incidence(),
            &prism.entry_edge(),
            &prism.exit_edge(),
            &params.trace,
        )
        .unwrap();
        let settings = RenderSettings {
            width: 320,
            height: 180,
            ..RenderSettings::default()
        };
        let viewport = Viewport::from_settings(&settings);

        let image = render_prism_scene(&prism, &beams, &viewport, &settings).unwrap();

        // Red and violet ends land on different pixels past the prism
        let lead_out = |beam: &Beam| {
            let p = beam.exit_point() + 2.0 * beam.exit_direction;
            let (x, y) = viewport.world_to_pixel(p);
            image.get(x as u32, y as u32)
        };
        let red = lead_out(&beams[0]);
        let violet = lead_out(&beams[beams.len() - 1]);
        assert!(red.x > red.z);
        assert!(violet.z > violet.y);
    }

    #[test]
    fn test_dot_cloud_shows_crests_only() {
        let wave = WaveIntoMedium::new(WaveParams::default()).unwrap();
        let field = TimeVaryingField::new(wave, dot_cloud_grid(15.0, 15.0, 2.0));
        let settings = RenderSettings::default();
        let viewport = Viewport::from_settings(&settings);
        let style = WaveStyle::dots(&settings);

        let image = render_dot_cloud(&field, &viewport, &style, 0.25).unwrap();

        // Wavelength 8 along x: a crest at x = 0 and a trough at x = -4,
        // both on the near side of the interface and clear of its line
        let pixel = |p: DVec3| {
            let (x, y) = viewport.world_to_pixel(p);
            image.get(x as u32, y as u32)
        };
        let crest = pixel(DVec3::new(0.0, 3.0, 0.0));
        let trough = pixel(DVec3::new(-4.0, 3.0, 0.0));
        // tanh(0.8) rounds up to 11/16
        assert!((crest.x - 11.0 / 16.0).abs() < 2e-2, "crest {crest:?}");
        assert_eq!(trough, settings.background);
        // The gap in the middle of four neighbouring dots stays background
        assert_eq!(pixel(DVec3::new(0.25, 3.25, 0.0)), settings.background);
    }

    #[test]
    fn test_beam_bounds() {
        assert!(beam_bounds(&[]).is_none());

        let beam = Beam {
            index: 1.0,
            alpha: 0.0,
            color: Color::ONE,
            points: [
                DVec3::new(-3.0, 1.0, 0.0),
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 2.0, 0.0),
                DVec3::new(4.0, -1.0, 0.0),
            ],
            exit_direction: DVec3::X,
        };
        let (lo, hi) = beam_bounds(&[beam]).unwrap();
        assert_eq!(lo, DVec3::new(-3.0, -1.0, 0.0));
        assert_eq!(hi, DVec3::new(4.0, 2.0, 0.0));
    }
}
