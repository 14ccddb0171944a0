//! Integration tests for configuration persistence.

use rustride_compliance::compliance::ComplianceAnalyzer;
use rustride_compliance::storage::config::{
    load_config_from, save_config_to, AnalysisConfig, ConfigError,
};
use tempfile::TempDir;

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("compliance.toml");

    let mut config = AnalysisConfig::default();
    config.matching.window_size = 5;
    config.scoring.skip_penalty = 7.5;
    save_config_to(&config, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(loaded, AnalysisConfig::default());
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compliance.toml");
    std::fs::write(&path, "[matching\nwindow_size = ").unwrap();

    assert!(matches!(load_config_from(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_loaded_config_drives_analyzer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compliance.toml");
    let contents = "[scoring]\nskip_penalty = 0.0\n\n[detection]\nboundary_dominance = 1.5\n";
    std::fs::write(&path, contents).unwrap();

    let mut config = load_config_from(&path).unwrap();
    assert_eq!(config.scoring.skip_penalty, 0.0);
    assert!(ComplianceAnalyzer::with_config(config.clone()).is_err());

    config.detection.boundary_dominance = 0.8;
    let analyzer = ComplianceAnalyzer::with_config(config).unwrap();
    assert_eq!(analyzer.config().detection.boundary_dominance, 0.8);
}
