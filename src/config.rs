//! Command-line and environment configuration for the binary.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::types::{
    EngineError, RoundConfig, DEFAULT_COLORS, DEFAULT_MIN_CONNECTED, DEFAULT_REPLAY_DELAY_MS,
    DEFAULT_SIZE, DEFAULT_TIMEOUT_MS,
};

/// Terminal SameGame with generated, always-solvable puzzles.
#[derive(Debug, Clone, Parser)]
#[command(name = "samegame", version, about, long_about = None)]
pub struct Cli {
    /// Grid side length
    #[arg(long, env = "SAMEGAME_SIZE", default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Number of tile colors
    #[arg(long, env = "SAMEGAME_COLORS", default_value_t = DEFAULT_COLORS as usize)]
    pub colors: usize,

    /// RNG seed; derived from the clock when omitted
    #[arg(long, env = "SAMEGAME_SEED")]
    pub seed: Option<u32>,

    /// Smallest removable group
    #[arg(long, env = "SAMEGAME_MIN_CONNECTED", default_value_t = DEFAULT_MIN_CONNECTED)]
    pub min_connected: usize,

    /// Generation time budget in milliseconds
    #[arg(long, env = "SAMEGAME_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Pause between replayed solution clicks in milliseconds
    #[arg(long, env = "SAMEGAME_REPLAY_DELAY_MS", default_value_t = DEFAULT_REPLAY_DELAY_MS)]
    pub replay_delay_ms: u64,

    /// Append a JSONL session log to this file
    #[arg(long, env = "SAMEGAME_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Generate one puzzle, print it as JSON, verify its solution, and exit
    #[arg(long)]
    pub headless: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub size: usize,
    pub colors: usize,
    pub seed: u32,
    pub round: RoundConfig,
    pub replay_delay: Duration,
    pub log_path: Option<PathBuf>,
    pub headless: bool,
}

impl AppConfig {
    /// Resolve CLI values, filling the seed from the clock if needed.
    ///
    /// Parameters no puzzle could satisfy are rejected here so the terminal is
    /// never entered with them.
    pub fn from_cli(cli: Cli) -> Result<Self, EngineError> {
        let round = RoundConfig::default()
            .with_min_connected(cli.min_connected)
            .with_timeout(Duration::from_millis(cli.timeout_ms));
        round.validate(cli.size, cli.colors)?;

        let log_path = cli
            .log_path
            .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty());

        Ok(Self {
            size: cli.size,
            colors: cli.colors,
            seed: cli.seed.unwrap_or_else(seed_from_clock),
            round,
            replay_delay: Duration::from_millis(cli.replay_delay_ms),
            log_path,
            headless: cli.headless,
        })
    }
}

/// One-off seed from wall-clock time, taken once at startup.
pub fn seed_from_clock() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    // Fold the fast-moving low bits with the seconds.
    (nanos as u32) ^ ((nanos >> 32) as u32)
}
