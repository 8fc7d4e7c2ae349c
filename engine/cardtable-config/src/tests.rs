//! Tests for the configuration module.

use super::*;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.table.rows, 3);
    assert_eq!(config.table.columns, 4);
    assert_eq!(config.table.deck_size, 81);
    assert_eq!(config.table.slot_count(), 12);
    assert_eq!(config.players.humans, 0);
    assert_eq!(config.players.computers, 2);
}

#[test]
fn test_timing_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.timing.turn_timeout_millis, 60_000);
    assert_eq!(config.timing.turn_timeout_warning_millis, 5_000);
    assert_eq!(config.timing.point_freeze_millis, 1_000);
    assert_eq!(config.timing.penalty_freeze_millis, 3_000);
    assert_eq!(config.timing.freeze_refresh_millis, 100);
}

#[test]
fn test_cardtable_env_overrides() {
    std::env::set_var("CARDTABLE_TABLE_ROWS", "4");
    std::env::set_var("CARDTABLE_PLAYERS_COMPUTERS", "6");
    std::env::set_var("CARDTABLE_TIMING_TURN_TIMEOUT_MILLIS", "30000");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.table.rows, 4);
    assert_eq!(config.players.computers, 6);
    assert_eq!(config.timing.turn_timeout_millis, 30_000);

    std::env::remove_var("CARDTABLE_TABLE_ROWS");
    std::env::remove_var("CARDTABLE_PLAYERS_COMPUTERS");
    std::env::remove_var("CARDTABLE_TIMING_TURN_TIMEOUT_MILLIS");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"

[table]
rows = 3
columns = 3
deck_size = 27

[players]
computers = 4
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.table.rows, 3);
    assert_eq!(config.table.columns, 3);
    assert_eq!(config.table.deck_size, 27);
    assert_eq!(config.table.slot_count(), 9);
    assert_eq!(config.players.computers, 4);
    // Unspecified sections fall back to defaults
    assert_eq!(config.timing.turn_timeout_millis, 60_000);
    assert_eq!(config.players.bot_interval_millis, 10);
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config: CentralConfig = toml::from_str("[timing]\npoint_freeze_millis = 250\n").unwrap();
    assert_eq!(config.timing.point_freeze_millis, 250);
    assert_eq!(config.timing.penalty_freeze_millis, 3_000);
}
