//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults live in a shared TOML file embedded at compile time, so the
//! file documents exactly what the binary falls back to.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    table: TableDefaults,
    timing: TimingDefaults,
    players: PlayersDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct TableDefaults {
    rows: usize,
    columns: usize,
    deck_size: usize,
}

#[derive(Debug, Deserialize)]
struct TimingDefaults {
    turn_timeout_millis: u64,
    turn_timeout_warning_millis: u64,
    point_freeze_millis: u64,
    penalty_freeze_millis: u64,
    freeze_refresh_millis: u64,
}

#[derive(Debug, Deserialize)]
struct PlayersDefaults {
    humans: usize,
    computers: usize,
    bot_interval_millis: u64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Table
pub fn rows() -> usize {
    DEFAULTS.table.rows
}
pub fn columns() -> usize {
    DEFAULTS.table.columns
}
pub fn deck_size() -> usize {
    DEFAULTS.table.deck_size
}

// Timing
pub fn turn_timeout_millis() -> u64 {
    DEFAULTS.timing.turn_timeout_millis
}
pub fn turn_timeout_warning_millis() -> u64 {
    DEFAULTS.timing.turn_timeout_warning_millis
}
pub fn point_freeze_millis() -> u64 {
    DEFAULTS.timing.point_freeze_millis
}
pub fn penalty_freeze_millis() -> u64 {
    DEFAULTS.timing.penalty_freeze_millis
}
pub fn freeze_refresh_millis() -> u64 {
    DEFAULTS.timing.freeze_refresh_millis
}

// Players
pub fn humans() -> usize {
    DEFAULTS.players.humans
}
pub fn computers() -> usize {
    DEFAULTS.players.computers
}
pub fn bot_interval_millis() -> u64 {
    DEFAULTS.players.bot_interval_millis
}
