//! Configuration for the dealer binary.
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use cardtable_config::{load_config, CentralConfig};
use cardtable_core::CARD_UNIVERSE;
use clap::Parser;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_rows() -> usize {
    CENTRAL_CONFIG.table.rows
}

fn default_columns() -> usize {
    CENTRAL_CONFIG.table.columns
}

fn default_deck_size() -> usize {
    CENTRAL_CONFIG.table.deck_size
}

fn default_humans() -> usize {
    CENTRAL_CONFIG.players.humans
}

fn default_computers() -> usize {
    CENTRAL_CONFIG.players.computers
}

fn default_bot_interval() -> u64 {
    CENTRAL_CONFIG.players.bot_interval_millis
}

fn default_turn_timeout() -> u64 {
    CENTRAL_CONFIG.timing.turn_timeout_millis
}

fn default_turn_timeout_warning() -> u64 {
    CENTRAL_CONFIG.timing.turn_timeout_warning_millis
}

fn default_point_freeze() -> u64 {
    CENTRAL_CONFIG.timing.point_freeze_millis
}

fn default_penalty_freeze() -> u64 {
    CENTRAL_CONFIG.timing.penalty_freeze_millis
}

fn default_freeze_refresh() -> u64 {
    CENTRAL_CONFIG.timing.freeze_refresh_millis
}

/// Countdown and lockout durations derived from [`Config`], shared by the
/// dealer and player threads.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Full round length before a forced reshuffle
    pub turn_timeout: Duration,
    /// Remaining time below which the countdown display warns
    pub turn_timeout_warning: Duration,
    /// Lockout after a valid claim
    pub point_freeze: Duration,
    /// Lockout after an invalid claim
    pub penalty_freeze: Duration,
    /// Display refresh step; also the shutdown-flag poll interval at every
    /// blocking wait
    pub refresh: Duration,
    /// Interval between synthetic slot selections
    pub bot_interval: Duration,
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "dealer")]
#[command(about = "Cardtable dealer - real-time matching card game")]
#[command(
    long_about = "Runs the dealer thread plus one thread per player (and one
synthetic-input thread per computer player) for a real-time matching card game.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Rows of slots on the table
    #[arg(long, default_value_t = default_rows())]
    pub rows: usize,

    /// Columns of slots on the table
    #[arg(long, default_value_t = default_columns())]
    pub columns: usize,

    /// Total number of cards in the universe
    #[arg(long, default_value_t = default_deck_size())]
    pub deck_size: usize,

    /// Seats driven by an external input source
    #[arg(long, default_value_t = default_humans())]
    pub humans: usize,

    /// Seats driven by a synthetic-input bot thread
    #[arg(long, default_value_t = default_computers())]
    pub computers: usize,

    /// Milliseconds between synthetic slot selections
    #[arg(long, default_value_t = default_bot_interval())]
    pub bot_interval_millis: u64,

    /// Round length in milliseconds before the dealer reshuffles
    #[arg(long, default_value_t = default_turn_timeout())]
    pub turn_timeout_millis: u64,

    /// Warning threshold for the countdown display, in milliseconds
    #[arg(long, default_value_t = default_turn_timeout_warning())]
    pub turn_timeout_warning_millis: u64,

    /// Lockout after a valid claim, in milliseconds
    #[arg(long, default_value_t = default_point_freeze())]
    pub point_freeze_millis: u64,

    /// Lockout after an invalid claim, in milliseconds
    #[arg(long, default_value_t = default_penalty_freeze())]
    pub penalty_freeze_millis: u64,

    /// Display refresh granularity in milliseconds
    #[arg(long, default_value_t = default_freeze_refresh())]
    pub freeze_refresh_millis: u64,

    /// Seed for the dealer's shuffles and the bots (omit for entropy)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(anyhow!("table must have at least one row and one column"));
        }

        if self.slot_count() < 3 {
            return Err(anyhow!(
                "table needs at least 3 slots for a claim, got {}",
                self.slot_count()
            ));
        }

        if self.deck_size < self.slot_count() {
            return Err(anyhow!(
                "deck_size {} cannot fill the {} table slots",
                self.deck_size,
                self.slot_count()
            ));
        }

        // Ids past the universe alias lower ids' feature vectors.
        if self.deck_size > CARD_UNIVERSE {
            return Err(anyhow!(
                "deck_size {} exceeds the {}-card universe",
                self.deck_size,
                CARD_UNIVERSE
            ));
        }

        if self.humans + self.computers == 0 {
            return Err(anyhow!("at least one player seat is required"));
        }

        if self.turn_timeout_millis == 0 {
            return Err(anyhow!("turn_timeout_millis must be greater than 0"));
        }

        if self.freeze_refresh_millis == 0 {
            return Err(anyhow!("freeze_refresh_millis must be greater than 0"));
        }

        if self.bot_interval_millis == 0 {
            return Err(anyhow!("bot_interval_millis must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Number of slots on the table
    pub fn slot_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn timing(&self) -> Timing {
        Timing {
            turn_timeout: Duration::from_millis(self.turn_timeout_millis),
            turn_timeout_warning: Duration::from_millis(self.turn_timeout_warning_millis),
            point_freeze: Duration::from_millis(self.point_freeze_millis),
            penalty_freeze: Duration::from_millis(self.penalty_freeze_millis),
            refresh: Duration::from_millis(self.freeze_refresh_millis),
            bot_interval: Duration::from_millis(self.bot_interval_millis),
        }
    }
}
