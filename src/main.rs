use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use loam::app::{App, HeadlessRenderer, HeadlessUi, WanderInput};
use loam::bootstrap;
use loam::config::CoreConfig;
use loam_geom::Vec2;
use loam_runtime::{Clock, ManualClock, SystemClock};
use loam_tiles::TileTable;

const VIEW: Vec2 = Vec2::new(640.0, 360.0);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "loam",
    version,
    about = "Headless soak run of the loam frame pipeline"
)]
struct Cli {
    /// TOML config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of display refreshes to simulate.
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Synthetic display refresh rate.
    #[arg(long, default_value_t = 60.0)]
    refresh_hz: f64,
    /// Insert a stall every N frames (0 disables).
    #[arg(long, default_value_t = 0)]
    stall_every: u64,
    /// Length of each inserted stall.
    #[arg(long, default_value_t = 0.0)]
    stall_ms: f64,
    /// World width in tiles.
    #[arg(long, default_value_t = 256)]
    width: usize,
    /// World height in tiles.
    #[arg(long, default_value_t = 128)]
    height: usize,
    /// Reload --config when it changes on disk.
    #[arg(long)]
    watch_config: bool,
    /// Pace frames to wall-clock time.
    #[arg(long)]
    realtime: bool,
    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level: LevelFilter = cli.log_level.into();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &cli.log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> CoreConfig {
    let Some(path) = path else {
        return CoreConfig::default();
    };
    match CoreConfig::load_from_path(path) {
        Ok(cfg) => {
            log::info!("config loaded from {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("config {} rejected, using defaults: {}", path.display(), e);
            CoreConfig::default()
        }
    }
}

fn load_tiles(cfg: &CoreConfig) -> TileTable {
    let Some(path) = cfg.world.tiles.as_ref() else {
        return TileTable::builtin();
    };
    match TileTable::load_from_path(path) {
        Ok(t) => {
            log::info!("{} tiles loaded from {}", t.len(), path.display());
            t
        }
        Err(e) => {
            log::warn!("tile table {} rejected, using built-in: {}", path.display(), e);
            TileTable::builtin()
        }
    }
}

type HeadlessApp = App<HeadlessRenderer, WanderInput, HeadlessUi>;

/// Longest single wait, in ms.
const MAX_WAIT_MS: f64 = 3_600_000.0;

/// A wait length safe to sleep on. NaN and negatives wait nothing; infinity waits the cap.
fn clamp_wait(ms: f64) -> f64 {
    if ms.is_nan() {
        0.0
    } else {
        ms.clamp(0.0, MAX_WAIT_MS)
    }
}

/// Drive `frames` refreshes. `wait` lets `ms` pass on `clock`, either by sleeping
/// or by advancing a manual clock. Stalls are waits too.
fn run_frames<C: Clock>(
    app: &mut HeadlessApp,
    cli: &Cli,
    frame_ms: f64,
    clock: &C,
    mut wait: impl FnMut(f64),
) {
    for i in 0..cli.frames {
        if cli.stall_every > 0 && i > 0 && i % cli.stall_every == 0 {
            wait(clamp_wait(cli.stall_ms));
        }
        app.frame(clock.now_ms());
        wait(frame_ms);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let cfg = load_config(cli.config.as_ref());
    let table = load_tiles(&cfg);
    let seed = bootstrap::layered(cli.width, cli.height, &table);
    let input = WanderInput::new(VIEW, cfg.world.tile_size);
    let mut app = App::new(
        seed,
        table,
        cfg,
        VIEW,
        HeadlessRenderer::default(),
        input,
        HeadlessUi::default(),
    );
    if cli.watch_config {
        match &cli.config {
            Some(path) => app.watch_config(path.clone()),
            None => log::warn!("--watch-config needs --config"),
        }
    }

    let hz = if cli.refresh_hz.is_finite() && cli.refresh_hz > 0.0 {
        cli.refresh_hz
    } else {
        60.0
    };
    let frame_ms = 1000.0 / hz;
    if cli.realtime {
        let clock = SystemClock::new();
        run_frames(&mut app, &cli, frame_ms, &clock, |ms| {
            std::thread::sleep(Duration::from_secs_f64(clamp_wait(ms) / 1000.0))
        });
    } else {
        let clock = ManualClock::new(0.0);
        run_frames(&mut app, &cli, frame_ms, &clock, |ms| {
            clock.advance(ms);
        });
    }

    let s = app.stats;
    let sched = app.scheduler.counters();
    println!("frames      {} ({} rendered)", s.frames, s.rendered);
    println!(
        "steps       {} ({} saturated frames, {:.1}ms dropped)",
        s.steps, sched.saturated_frames, s.discarded_ms
    );
    println!(
        "lighting    {} recomputes, {} cells, {} truncated fills",
        s.light_recomputes, s.light_cells_written, s.truncated_fills
    );
    println!(
        "ui          {} minimap, {} hotbar",
        s.minimap_flushes, s.hotbar_flushes
    );
    println!(
        "quality     tier {} scale {:.3} transitions {} last fps {}",
        app.governor.tier().as_str(),
        app.governor.scale(),
        s.tier_transitions,
        s.last_fps.map_or_else(|| "-".to_string(), |f| format!("{f:.1}"))
    );
    println!(
        "config      {} reloads, {} rejected",
        s.config_reloads, s.config_rejects
    );
    Ok(())
}
