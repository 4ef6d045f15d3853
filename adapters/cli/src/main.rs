#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Path Defence session.

mod autopilot;
mod config;
mod session;
mod summary;

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use path_defence_core::{Command, GameSpeed, Rules};
use path_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autopilot::Autopilot;
use session::Session;
use summary::{Summary, Tally};

/// Runs a Path Defence session without a renderer and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "path-defence", version, about)]
struct Cli {
    /// Real seconds to simulate before stopping.
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Real milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Speed multiplier applied to every frame.
    #[arg(long, value_enum, default_value_t = SpeedArg::Normal)]
    speed: SpeedArg,

    /// Let a seeded bot build and upgrade towers.
    #[arg(long)]
    autobuild: bool,

    /// Seed for the bot's tile choices.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// TOML file overriding parts of the default rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Tracing filter directive; defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_filter: Option<String>,

    /// Start each wave as soon as the previous one completes.
    #[arg(long)]
    auto_waves: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpeedArg {
    #[value(name = "1")]
    Normal,
    #[value(name = "2")]
    Double,
}

impl From<SpeedArg> for GameSpeed {
    fn from(value: SpeedArg) -> Self {
        match value {
            SpeedArg::Normal => GameSpeed::Normal,
            SpeedArg::Double => GameSpeed::Double,
        }
    }
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref())?;

    let rules = match &cli.rules {
        Some(path) => config::load_rules(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => Rules::default(),
    };
    let run_for =
        Duration::try_from_secs_f64(cli.seconds).context("--seconds must be non-negative")?;
    let frame = Duration::from_millis(cli.frame_ms);
    if frame.is_zero() {
        anyhow::bail!("--frame-ms must be positive");
    }

    let mut session = Session::new(rules);
    let tally = Rc::new(RefCell::new(Tally::default()));
    let sink = Rc::clone(&tally);
    session.subscribe(move |_, events| sink.borrow_mut().record(events));

    let _ = session.submit(Command::StartGame);
    let _ = session.submit(Command::SetSpeed {
        speed: cli.speed.into(),
    });

    let mut autopilot = cli.autobuild.then(|| Autopilot::new(cli.seed));
    let mut elapsed = Duration::ZERO;

    while elapsed < run_for && !query::is_game_over(session.world()) {
        if let Some(pilot) = autopilot.as_mut() {
            for command in pilot.plan(session.world()) {
                let _ = session.submit(command);
            }
        }
        if cli.auto_waves && query::can_start_next_wave(session.world()) {
            let _ = session.submit(Command::StartNextWave);
        }
        let _ = session.frame(frame);
        elapsed += frame;
    }

    info!(
        real_secs = elapsed.as_secs_f64(),
        "session finished"
    );
    let tally = tally.borrow().clone();
    println!("{}", Summary::new(session.world(), tally));
    Ok(())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
