//! Lava Leap headless runner
//!
//! Loads the configured stages and drives the simulation without a window,
//! feeding a scripted input pattern. Useful for checking stage files and
//! replaying runs from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::LevelFilter;
use serde::Serialize;

use lava_leap::sim::{SimEvent, Tile, TickInput};
use lava_leap::{Runner, Settings};

/// Scripted input fed to every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// No input
    Idle,
    /// Hold right
    Right,
    /// Hold right and press jump twice a second
    Hop,
}

impl Script {
    fn input(self, tick: u64, tick_rate: f64) -> TickInput {
        let half_second = (tick_rate / 2.0).max(2.0) as u64;
        match self {
            Script::Idle => TickInput::default(),
            Script::Right => TickInput {
                move_right: true,
                ..Default::default()
            },
            Script::Hop => TickInput {
                move_right: true,
                jump: tick % half_second == 0,
                ..Default::default()
            },
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Run Lava Leap stages headless", long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used if it is missing
    #[arg(short, long, default_value = "settings.json")]
    settings: PathBuf,

    /// Stage images to play instead of the configured list
    #[arg(long = "stage")]
    stages: Vec<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Input pattern
    #[arg(long, value_enum, default_value_t = Script::Hop)]
    script: Script,

    /// Print the autotiled grid of the first stage and exit
    #[arg(long)]
    print_grid: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Summary {
    stage: usize,
    ticks: u64,
    time: f64,
    x: f32,
    y: f32,
    health: i32,
    dead: bool,
    ended: bool,
    coins: u32,
    total_coins: usize,
    deaths: usize,
    events: Vec<SimEvent>,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Lava Leap (headless) starting...");

    let mut settings = if args.settings.exists() {
        Settings::load(&args.settings)
            .with_context(|| format!("reading {}", args.settings.display()))?
    } else {
        Settings::default()
    };
    if !args.stages.is_empty() {
        settings.stages = args.stages.clone();
    }

    let base = args
        .settings
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let mut runner = Runner::from_settings(&settings, &base).context("loading first stage")?;

    if args.print_grid {
        print_grid(&runner);
        return Ok(());
    }

    let total_ticks = (args.seconds * settings.tick_rate).max(0.0) as u64;
    let mut events = Vec::new();
    for t in 0..total_ticks {
        runner.set_input(args.script.input(t, settings.tick_rate));
        runner.step();
        events.extend(runner.drain_events());
    }

    let world = runner.world();
    let summary = Summary {
        stage: world.stage_index,
        ticks: runner.ticks(),
        time: world.time,
        x: world.player.pos().x,
        y: world.player.pos().y,
        health: world.player.health,
        dead: world.player.dead,
        ended: world.player.ended,
        coins: world.player.coins_collected,
        total_coins: world.total_coins(),
        deaths: events
            .iter()
            .filter(|e| matches!(e, SimEvent::PlayerDied { .. }))
            .count(),
        events,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing summary")?
    );
    Ok(())
}

/// One character per cell
fn print_grid(runner: &Runner) {
    let grid = &runner.world().stage.grid;
    for y in 0..grid.height() as i32 {
        let row: String = (0..grid.width() as i32)
            .map(|x| match grid.get(x, y) {
                Tile::EMPTY => '.',
                Tile::LAVA => '~',
                Tile::LAVA_SURFACE => '^',
                Tile::GOAL => 'G',
                t if t.is_block_a() => '#',
                t if t.is_block_b() => 'b',
                _ => '?',
            })
            .collect();
        println!("{row}");
    }
}
