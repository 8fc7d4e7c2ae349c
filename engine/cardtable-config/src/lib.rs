//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the cardtable components (dealer binary, tests).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`CARDTABLE_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (embedded config.defaults.toml)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! CARDTABLE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     CARDTABLE_TABLE_ROWS=3
//!     CARDTABLE_TABLE_DECK_SIZE=81
//!     CARDTABLE_TIMING_TURN_TIMEOUT_MILLIS=60000
//!     CARDTABLE_PLAYERS_COMPUTERS=4
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
