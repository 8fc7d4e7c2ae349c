//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by CARDTABLE_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("CARDTABLE_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from CARDTABLE_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "CARDTABLE_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &PathBuf) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (usize, u64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: CARDTABLE_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "CARDTABLE_COMMON_LOG_LEVEL");

    // Table
    env_override!(config, table.rows, "CARDTABLE_TABLE_ROWS", parse);
    env_override!(config, table.columns, "CARDTABLE_TABLE_COLUMNS", parse);
    env_override!(config, table.deck_size, "CARDTABLE_TABLE_DECK_SIZE", parse);

    // Timing
    env_override!(
        config,
        timing.turn_timeout_millis,
        "CARDTABLE_TIMING_TURN_TIMEOUT_MILLIS",
        parse
    );
    env_override!(
        config,
        timing.turn_timeout_warning_millis,
        "CARDTABLE_TIMING_TURN_TIMEOUT_WARNING_MILLIS",
        parse
    );
    env_override!(
        config,
        timing.point_freeze_millis,
        "CARDTABLE_TIMING_POINT_FREEZE_MILLIS",
        parse
    );
    env_override!(
        config,
        timing.penalty_freeze_millis,
        "CARDTABLE_TIMING_PENALTY_FREEZE_MILLIS",
        parse
    );
    env_override!(
        config,
        timing.freeze_refresh_millis,
        "CARDTABLE_TIMING_FREEZE_REFRESH_MILLIS",
        parse
    );

    // Players
    env_override!(config, players.humans, "CARDTABLE_PLAYERS_HUMANS", parse);
    env_override!(
        config,
        players.computers,
        "CARDTABLE_PLAYERS_COMPUTERS",
        parse
    );
    env_override!(
        config,
        players.bot_interval_millis,
        "CARDTABLE_PLAYERS_BOT_INTERVAL_MILLIS",
        parse
    );

    config
}
