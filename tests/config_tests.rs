// Integration tests for configuration loading and validation

mod common;

use crypto_desk_sim::{Config, ConfigError, DeskError};
use common::create_test_config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_serialization_deserialization() {
    let config = create_test_config();

    let toml_string = toml::to_string(&config).expect("Failed to serialize config");
    assert!(toml_string.contains("spot_pair"));
    assert!(toml_string.contains("BTC/USDT"));

    let deserialized: Config = toml::from_str(&toml_string).expect("Failed to deserialize config");
    assert_eq!(deserialized.simulation.path_len, 20);
    assert_eq!(deserialized.exchange.perp_rest_url, config.exchange.perp_rest_url);
    assert_eq!(deserialized.stress.fee_multipliers, config.stress.fee_multipliers);
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("desk.toml");

    let mut config = create_test_config();
    config.exchange.spot_pair = "ETH/USDT".to_string();
    config.simulation.seed = 7;
    config.to_file(&config_path).expect("Failed to write config");

    let loaded = Config::from_file(&config_path).expect("Failed to load config");
    assert_eq!(loaded.exchange.spot_pair, "ETH/USDT");
    assert_eq!(loaded.simulation.seed, 7);
    assert_eq!(loaded.desk.depth, 2);
}

#[test]
fn test_load_or_create_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    assert!(!config_path.exists());

    let config = Config::load_or_create(&config_path).expect("Failed to create config");
    assert!(config_path.exists());
    assert_eq!(config.simulation.seed, 42);

    // second call reads the file back
    let again = Config::load_or_create(&config_path).expect("Failed to reload config");
    assert_eq!(again.exchange.book_limit, config.exchange.book_limit);
}

#[test]
fn test_missing_file_reports_not_found() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = Config::from_file(temp_dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));

    let desk_err: DeskError = err.into();
    assert!(matches!(desk_err, DeskError::ConfigNotFound(_)));
    assert!(desk_err.user_message().contains("desk init"));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[exchange\nspot_pair = ").expect("Failed to write file");

    assert!(matches!(Config::from_file(&config_path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.toml");

    let mut config = create_test_config();
    config.simulation.volume_min = 20;
    config.simulation.volume_max = 20;
    fs::write(&config_path, toml::to_string(&config).expect("Failed to serialize"))
        .expect("Failed to write file");

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert_eq!(DeskError::from(err).category(), "config");
}

#[test]
fn test_empty_stress_grid_rejected() {
    let mut config = create_test_config();
    config.stress.vol_multipliers.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_sections_are_optional() {
    let config: Config = toml::from_str("[exchange]\nspot_rest_url = \"http://localhost:1\"\nperp_rest_url = \"http://localhost:2\"\nspot_pair = \"SOL/USDT\"\nperp_pair = \"SOL/USDT\"\ntimeout_ms = 500\nretries = 1\nretry_delay_secs = 0\nbook_limit = 10\ncandle_timeframe = \"1h\"\ncandle_limit = 48\n")
        .expect("Failed to parse partial config");

    assert!(config.validate().is_ok());
    assert_eq!(config.exchange.spot_pair, "SOL/USDT");
    assert_eq!(config.simulation.path_len, 60);
    assert_eq!(config.desk.var_alpha, 0.99);
}
