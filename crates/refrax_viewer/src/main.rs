use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use refrax_optics::math::DVec3;
use refrax_optics::{
    refract_through_prism_each, refract_through_prism_with, snell, Beam, SceneConfig,
    TimeVaryingField, WaveIntoMedium,
};
use refrax_render::{
    beam_bounds, render_dot_cloud, render_prism_scene, render_wave_scene, Viewport, WaveStyle,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "refrax", version, about = "Refraction and dispersion renderer")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render frames of a wave crossing into a denser medium.
    Wave(WaveArgs),
    /// Render a beam dispersed by a prism.
    Prism(PrismArgs),
    /// Print the refracted angle for one interface.
    Snell(SnellArgs),
    /// Print scene data as JSON.
    Dump(DumpArgs),
}

#[derive(Parser, Debug)]
struct WaveArgs {
    /// Scene config JSON; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to render.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Frames per second; overrides the config.
    #[arg(long)]
    fps: Option<f64>,

    /// Draw the field as a cloud of dots that light up on crests.
    #[arg(long, default_value_t = false)]
    dots: bool,

    /// Output directory for frame_0000.png, frame_0001.png, ...
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PrismArgs {
    /// Scene config JSON; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Drop indices that are totally internally reflected instead of failing.
    #[arg(long, default_value_t = false)]
    skip_failed: bool,
}

#[derive(Parser, Debug)]
struct SnellArgs {
    /// Angle of incidence in degrees.
    #[arg(long, allow_hyphen_values = true)]
    theta1: f64,

    /// Refractive index of the second medium relative to the first.
    #[arg(long)]
    index: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpWhat {
    Beams,
    Field,
    Config,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Scene config JSON; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = DumpWhat::Beams)]
    what: DumpWhat,

    /// Field time, for `--what field`.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
}

/// One sample of the wave field.
#[derive(Serialize)]
struct FieldSample {
    point: DVec3,
    vector: DVec3,
    opacity: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Wave(args) => cmd_wave(args),
        Command::Prism(args) => cmd_prism(args),
        Command::Snell(args) => cmd_snell(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("load scene config '{}'", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn cmd_wave(args: WaveArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let fps = args.fps.unwrap_or(config.render.fps);
    if !fps.is_finite() || fps <= 0.0 {
        anyhow::bail!("fps must be positive, got {fps}");
    }

    let wave = WaveIntoMedium::new(config.wave).context("build wave field")?;
    let viewport = Viewport::from_settings(&config.render);
    // Only the dot cloud draws individual samples; field mode shades every pixel
    let (style, points) = if args.dots {
        (WaveStyle::dots(&config.render), config.grid.dot_points())
    } else {
        (WaveStyle::field(&config.render), Vec::new())
    };
    let mut field = TimeVaryingField::new(wave, points);

    if args.frames == 0 {
        log::warn!("--frames 0 renders nothing");
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    if args.dots {
        log::info!(
            "Rendering {} frames at {} fps, {} dots of radius {}",
            args.frames,
            fps,
            field.points().len(),
            config.grid.dot_radius()
        );
    } else {
        log::info!("Rendering {} frames at {} fps", args.frames, fps);
    }
    for frame in 0..args.frames {
        let image = if args.dots {
            render_dot_cloud(&field, &viewport, &style, config.grid.dot_radius())
        } else {
            render_wave_scene(field.field(), field.time(), &viewport, &style)
        }
        .with_context(|| format!("render frame {frame}"))?;

        let path = args.out.join(format!("frame_{frame:04}.png"));
        image
            .save_png(&path)
            .with_context(|| format!("write png '{}'", path.display()))?;
        field.tick(1.0 / fps)?;
    }

    eprintln!("wrote {} frames to {}", args.frames, args.out.display());
    Ok(())
}

/// Trace the configured beam fan.
///
/// With `skip_failed`, samples that cannot leave the prism are dropped with a
/// warning; otherwise the first of them fails the whole fan.
fn trace_beams(config: &SceneConfig, skip_failed: bool) -> Result<Vec<Beam>> {
    let params = &config.prism;
    let prism = params.prism();
    let (entry, exit) = (prism.entry_edge(), prism.exit_edge());

    if !skip_failed {
        let beams = refract_through_prism_with(
            params.indices(),
            params.n_beams,
            &params.incidence(),
            &entry,
            &exit,
            &params.trace,
        )
        .context("trace beams through prism")?;
        return Ok(beams);
    }

    let results = refract_through_prism_each(
        params.indices(),
        params.n_beams,
        &params.incidence(),
        &entry,
        &exit,
        &params.trace,
    )
    .context("trace beams through prism")?;

    let total = results.len();
    let mut first_failure = None;
    let beams: Vec<Beam> = results
        .into_iter()
        .filter_map(|result| match result {
            Ok(beam) => Some(beam),
            Err(err) => {
                first_failure.get_or_insert(err);
                None
            }
        })
        .collect();
    if let Some(err) = first_failure {
        log::warn!(
            "skipped {} of {} beams; first failure: {err}",
            total - beams.len(),
            total
        );
    }
    Ok(beams)
}

fn cmd_prism(args: PrismArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let beams = trace_beams(&config, args.skip_failed)?;
    let viewport = Viewport::from_settings(&config.render);
    if let Some((lo, hi)) = beam_bounds(&beams) {
        log::debug!("beam fan spans {lo:?} to {hi:?}");
    }

    let image = render_prism_scene(&config.prism.prism(), &beams, &viewport, &config.render)
        .context("render prism scene")?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_snell(args: SnellArgs) -> Result<()> {
    let theta2 = snell::refraction_angle(args.theta1.to_radians(), args.index)?;
    write_output(&mut io::stdout().lock(), &format!("{:.6}", theta2.to_degrees()))
}

fn cmd_dump(args: DumpArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let json = match args.what {
        DumpWhat::Beams => serde_json::to_string_pretty(&trace_beams(&config, false)?)?,
        DumpWhat::Field => {
            let wave = WaveIntoMedium::new(config.wave).context("build wave field")?;
            let mut field = TimeVaryingField::new(wave, config.grid.points());
            field.set_time(args.time);

            let samples: Vec<FieldSample> = field
                .points()
                .iter()
                .zip(field.sample())
                .map(|(&point, vector)| FieldSample {
                    point,
                    vector,
                    opacity: field.field().opacity_of(vector),
                })
                .collect();
            serde_json::to_string_pretty(&samples)?
        }
        DumpWhat::Config => config.to_json()?,
    };

    write_output(&mut io::stdout().lock(), &json)
}

/// Write `text` and a newline, treating a closed pipe (`refrax dump | head`)
/// as a normal end of output.
fn write_output<W: Write>(out: &mut W, text: &str) -> Result<()> {
    match writeln!(out, "{text}").and_then(|()| out.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.context("write to stdout"),
    }
}
