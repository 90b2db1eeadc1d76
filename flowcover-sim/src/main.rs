//! Headless flowcover host.
//!
//! Builds a widget over a directory of images (or generated swatches), plays
//! a short scripted gesture sequence against it and prints what a renderer
//! would have drawn.

mod library;
mod script;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Target};
use flowcover_core::model::Viewport;
use flowcover_core::{FlowCover, FlowCoverSettings, Preset};
use log::LevelFilter;

use library::Library;
use script::Simulation;

#[derive(Parser, Debug)]
#[command(name = "flowcover-sim")]
#[command(about = "Drive a cover flow with scripted gestures and print the frames")]
struct Cli {
    /// Directory of cover images; generated swatches are used when omitted
    images: Option<PathBuf>,

    /// Number of swatches when no image directory is given
    #[arg(long, default_value_t = 24)]
    count: usize,

    /// JSON settings file; missing fields take their defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Layout preset applied on top of the settings (classic, flat, carousel, stacked)
    #[arg(long, value_parser = parse_preset)]
    preset: Option<Preset>,

    /// Load tiles on the calling thread instead of the background loader
    #[arg(long)]
    sync: bool,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 480.0)]
    height: f32,

    /// Longest side of decoded thumbnails in pixels
    #[arg(long, default_value_t = 256)]
    thumb: u32,

    /// Forward swipes to perform before the final tap
    #[arg(long, default_value_t = 3)]
    swipes: usize,

    /// Simulated frame interval in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    dump_settings: bool,
}

fn parse_preset(name: &str) -> Result<Preset, String> {
    serde_json::from_value(serde_json::Value::String(name.to_ascii_lowercase()))
        .map_err(|_| format!("unknown preset '{name}'"))
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("flowcover_sim", LevelFilter::Debug)
        .filter_module("flowcover_core", LevelFilter::Info)
        .init();
}

fn load_settings(cli: &Cli) -> Result<FlowCoverSettings> {
    let mut settings = match &cli.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => FlowCoverSettings::default(),
    };
    if let Some(preset) = cli.preset {
        preset.apply(&mut settings.layout);
    }
    if cli.sync {
        settings.async_loading = false;
    }
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    if cli.dump_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let library = match &cli.images {
        Some(dir) => Library::scan(dir, cli.thumb)
            .with_context(|| format!("failed to scan {}", dir.display()))?,
        None => Library::swatches(cli.count, cli.thumb),
    };

    let mut cover = FlowCover::new(library, Library::placeholder(), settings)
        .context("failed to build the cover flow")?;
    cover.set_viewport(Viewport::new(cli.width, cli.height));
    let reporter = script::reporter();
    cover.add_observer(reporter.clone());

    let mut sim = Simulation::new(cover, Duration::from_millis(cli.frame_ms.max(1)));
    for n in 0..cli.swipes {
        sim.swipe_forward(Duration::from_millis(120));
        if !sim.settle(1_000) {
            log::warn!("row still moving after swipe {}", n + 1);
        }
        log::info!(
            "swipe {} settled on tile {}",
            n + 1,
            sim.cover().focused_index()
        );
    }

    let center = sim.cover().viewport().center();
    sim.tap(center);

    let frame = sim.wait_for_loads(Duration::from_secs(2));
    println!(
        "focused {} of {} after {} frames (offset {:.3}, {:?})",
        frame.focused,
        sim.cover().tile_count(),
        sim.frames(),
        frame.offset,
        frame.phase
    );
    for tile in &frame.tiles {
        let (w, h) = tile.resource.dimensions();
        println!(
            "  tile {:>3}  d={:+.2}  x={:+.3}  rot={:+.3}  scale={:.3}  alpha={:.3}  rect=({:.0},{:.0})-({:.0},{:.0})  {}x{}{}",
            tile.visual.index,
            tile.visual.relative,
            tile.visual.translation.x,
            tile.visual.rotation,
            tile.visual.scale,
            tile.visual.opacity,
            tile.rect.min.x,
            tile.rect.min.y,
            tile.rect.max.x,
            tile.rect.max.y,
            w,
            h,
            if tile.loaded { "" } else { "  (placeholder)" },
        );
    }
    println!(
        "selections {}  focus changes {}  loads {}  cached {}/{}",
        reporter.selections.load(Ordering::Relaxed),
        reporter.focus_changes.load(Ordering::Relaxed),
        reporter.loads.load(Ordering::Relaxed),
        sim.cover().cache().len(),
        sim.cover().cache().capacity(),
    );

    Ok(())
}
