use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rg_gauge::config::AppConfig;
use rg_gauge::{GaugeDisplayer, GaugeMode, ManualTicker, SvgSurface};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Upper bound on exported frames, so a misconfigured animation cannot run forever
const MAX_FRAMES: usize = 10_000;

/// rg-gauge - Render animated radial gauges to SVG
#[derive(Parser, Debug, Clone)]
#[command(name = "rg-gauge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Gauge value (overrides the config)
    #[arg(long)]
    value: Option<f64>,

    /// Range minimum (overrides the config)
    #[arg(long)]
    min: Option<f64>,

    /// Range maximum (overrides the config)
    #[arg(long)]
    max: Option<f64>,

    /// Gauge silhouette: standard, donut or differential
    #[arg(long, value_parser = parse_mode)]
    mode: Option<GaugeMode>,

    /// Final snapshot file
    #[arg(short = 'o', long = "output", default_value = "gauge.svg")]
    output: PathBuf,

    /// Also write every animation frame into this directory
    #[arg(long, value_name = "DIR")]
    frames: Option<PathBuf>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

fn parse_mode(s: &str) -> Result<GaugeMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "standard" => Ok(GaugeMode::Standard),
        "donut" => Ok(GaugeMode::Donut),
        "differential" => Ok(GaugeMode::Differential),
        _ => Err(format!(
            "Expected standard, donut or differential, got: {}",
            s
        )),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting rg-gauge v{}", env!("CARGO_PKG_VERSION"));

    let app_config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => AppConfig::load()?,
    };

    let mut gauge = app_config.effective_gauge();
    if let Some(value) = cli.value {
        gauge.value = value;
    }
    if let Some(min) = cli.min {
        gauge.min = min;
    }
    if let Some(max) = cli.max {
        gauge.max = max;
    }
    if cli.mode.is_some() {
        gauge.mode = cli.mode;
    }

    let interval = Duration::from_millis(app_config.frame_interval_ms.max(1));
    let ticker = Rc::new(ManualTicker::new());
    let surface = SvgSurface::new(gauge.width, gauge.height);
    let displayer = GaugeDisplayer::new(gauge, surface, ticker.clone())?;

    let frames = match &cli.frames {
        Some(dir) => export_frames(&displayer, &ticker, interval, dir)?,
        None => ticker.run_until_idle(interval, MAX_FRAMES),
    };
    if ticker.has_pending() {
        warn!("Animation still running after {} frames", MAX_FRAMES);
    }

    displayer
        .with_surface(|surface| surface.write_to(&cli.output))
        .with_context(|| format!("Failed to write {:?}", cli.output))?;
    info!(
        "Rendered value {} in {} frames to {:?}",
        displayer.value(),
        frames,
        cli.output
    );
    Ok(())
}

/// Step the animation, writing `frame_NNNN.svg` after every frame
fn export_frames(
    displayer: &GaugeDisplayer<SvgSurface>,
    ticker: &ManualTicker,
    interval: Duration,
    dir: &Path,
) -> Result<usize> {
    std::fs::create_dir_all(dir)?;

    let write_frame = |index: usize| {
        let path = dir.join(format!("frame_{:04}.svg", index));
        displayer.with_surface(|surface| surface.write_to(&path))
    };

    write_frame(0)?;
    let mut frames = 0;
    while ticker.has_pending() && frames < MAX_FRAMES {
        ticker.step(interval);
        frames += 1;
        write_frame(frames)?;
    }
    info!("Wrote {} frames to {:?}", frames + 1, dir);
    Ok(frames)
}
