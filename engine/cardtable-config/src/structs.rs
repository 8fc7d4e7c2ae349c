//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_rows() -> usize {
    defaults::rows()
}
fn d_columns() -> usize {
    defaults::columns()
}
fn d_deck_size() -> usize {
    defaults::deck_size()
}
fn d_turn_timeout() -> u64 {
    defaults::turn_timeout_millis()
}
fn d_turn_timeout_warning() -> u64 {
    defaults::turn_timeout_warning_millis()
}
fn d_point_freeze() -> u64 {
    defaults::point_freeze_millis()
}
fn d_penalty_freeze() -> u64 {
    defaults::penalty_freeze_millis()
}
fn d_freeze_refresh() -> u64 {
    defaults::freeze_refresh_millis()
}
fn d_humans() -> usize {
    defaults::humans()
}
fn d_computers() -> usize {
    defaults::computers()
}
fn d_bot_interval() -> u64 {
    defaults::bot_interval_millis()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub players: PlayersConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Board geometry and card universe
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TableConfig {
    #[serde(default = "d_rows")]
    pub rows: usize,
    #[serde(default = "d_columns")]
    pub columns: usize,
    /// Total number of cards in the universe (deck at game start)
    #[serde(default = "d_deck_size")]
    pub deck_size: usize,
}

impl TableConfig {
    /// Number of slots on the table
    pub fn slot_count(&self) -> usize {
        self.rows * self.columns
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            columns: defaults::columns(),
            deck_size: defaults::deck_size(),
        }
    }
}

/// Countdown and lockout durations, all in milliseconds
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    /// Full length of a round before the dealer reshuffles
    #[serde(default = "d_turn_timeout")]
    pub turn_timeout_millis: u64,
    /// Remaining time below which the countdown display is flagged as a warning
    #[serde(default = "d_turn_timeout_warning")]
    pub turn_timeout_warning_millis: u64,
    /// Lockout after a valid claim
    #[serde(default = "d_point_freeze")]
    pub point_freeze_millis: u64,
    /// Lockout after an invalid claim
    #[serde(default = "d_penalty_freeze")]
    pub penalty_freeze_millis: u64,
    /// Granularity of countdown/freeze display refreshes and of shutdown-flag polls
    #[serde(default = "d_freeze_refresh")]
    pub freeze_refresh_millis: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            turn_timeout_millis: defaults::turn_timeout_millis(),
            turn_timeout_warning_millis: defaults::turn_timeout_warning_millis(),
            point_freeze_millis: defaults::point_freeze_millis(),
            penalty_freeze_millis: defaults::penalty_freeze_millis(),
            freeze_refresh_millis: defaults::freeze_refresh_millis(),
        }
    }
}

/// Seat configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayersConfig {
    /// Seats driven by an external input source
    #[serde(default = "d_humans")]
    pub humans: usize,
    /// Seats driven by a synthetic-input bot thread
    #[serde(default = "d_computers")]
    pub computers: usize,
    /// Interval between synthetic slot selections
    #[serde(default = "d_bot_interval")]
    pub bot_interval_millis: u64,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        Self {
            humans: defaults::humans(),
            computers: defaults::computers(),
            bot_interval_millis: defaults::bot_interval_millis(),
        }
    }
}
