#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays recorded frames through the autopilot.

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use robotron_autopilot_cli::{
    frame_log::FrameLogEnvironment,
    host::Pilot,
    settings::{load_policy_config, BoardSize},
};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "robotron_autopilot=info";

/// Replays a JSON-lines frame log and prints one encoded action per frame.
#[derive(Debug, Parser)]
#[command(name = "robotron-autopilot", version)]
struct Cli {
    /// JSON-lines frame log to replay.
    #[arg(long)]
    frames: PathBuf,
    /// Board size reported by the game, as WIDTHxHEIGHT.
    #[arg(long, default_value_t = BoardSize::DEFAULT)]
    board: BoardSize,
    /// TOML file overriding the policy tuning values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after deciding this many frames.
    #[arg(long)]
    max_frames: Option<u64>,
    /// Log filter directives, overriding `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let config = load_policy_config(cli.config.as_deref())?;
    let mut pilot = Pilot::new(config);
    if let Some(limit) = cli.max_frames {
        pilot = pilot.with_max_frames(limit);
    }
    if cli.board != BoardSize::DEFAULT {
        tracing::info!(board = %cli.board, "using custom board size");
    }

    let mut env = FrameLogEnvironment::open(&cli.frames, cli.board.dimensions())
        .with_context(|| format!("failed to open frame log {}", cli.frames.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_error = None;
    let report = pilot
        .fly(&mut env, |decision| {
            if write_error.is_none() {
                if let Err(error) = writeln!(out, "{}", decision.encode()) {
                    write_error = Some(error);
                }
            }
        })
        .with_context(|| format!("failed to replay {}", cli.frames.display()))?;

    if let Some(error) = write_error {
        return Err(error).context("failed to write actions");
    }
    out.flush().context("failed to write actions")?;

    tracing::info!(frames = report.frames, deaths = report.deaths, "replay complete");
    Ok(())
}

fn init_logging(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter '{directives}'"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialise logging: {error}"))
}
