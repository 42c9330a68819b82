// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::path::PathBuf;

use altinn_test_tokens::config::{
    check_schema, Config, EnvironmentCatalog, TokenConfig, CONFIG_SCHEMA,
};
use anyhow::Result;
use tempfile::tempdir;

#[test]
fn test_config_load_and_save() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    let mut config = Config::default();
    config.environments.0.insert("yt01".to_string(), true);
    config.environments.0.insert("prod".to_string(), false);
    config.certificates.directory = PathBuf::from("/srv/keys");
    config.token = TokenConfig { default_ttl: 600 };

    config.save_to_file(&config_path)?;
    let loaded = Config::from_file(&config_path)?;

    assert_eq!(loaded, config);
    assert!(loaded.contains_environment("yt01"));
    assert!(loaded.contains_environment("prod"));
    assert!(!loaded.contains_environment("yt02"));
    Ok(())
}

#[test]
fn test_missing_file_creates_default() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    let config = Config::from_file(&config_path)?;
    assert!(config_path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(config.token.default_ttl, 1800);
    assert_eq!(config.certificates.directory, PathBuf::from("./certificates"));
    for env in ["at21", "at22", "tt02", "prod"] {
        assert!(config.contains_environment(env));
    }
    Ok(())
}

#[test]
fn test_partial_config_uses_defaults() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, "environments:\n  tt02: true\n")?;

    let config = Config::from_file(&config_path)?;
    assert!(config.contains_environment("tt02"));
    assert!(!config.contains_environment("at21"));
    assert_eq!(config.token.default_ttl, 1800);
    Ok(())
}

#[test]
fn test_schema_rejects_ttl_out_of_range() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, "token:\n  default_ttl: 0\n")?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Configuration validation failed"));
    assert!(temp_dir.path().join("config.sample.yaml").exists());
    Ok(())
}

#[test]
fn test_schema_rejects_unknown_section() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, "visualization:\n  port: 8080\n")?;

    assert!(Config::from_file(&config_path).is_err());
    Ok(())
}

#[test]
fn test_specific_rules_reject_path_like_environment() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, "environments:\n  \"..\": true\n")?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid environment name"));
    Ok(())
}

#[test]
fn test_apply_args() {
    let mut config = Config::default();
    config.apply_args(None, None);
    assert_eq!(config, Config::default());

    config.apply_args(Some(PathBuf::from("/tmp/keys")), Some(42));
    assert_eq!(config.certificates.directory, PathBuf::from("/tmp/keys"));
    assert_eq!(config.token.default_ttl, 42);
}

#[test]
fn test_embedded_schema_is_valid_json() -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(CONFIG_SCHEMA)?;
    assert_eq!(schema["type"], "object");
    assert!(schema["properties"]["environments"].is_object());
    Ok(())
}

#[test]
fn test_from_yaml_str_pipeline() -> Result<()> {
    assert_eq!(Config::from_yaml_str("{}")?, Config::default());

    let config = Config::from_yaml_str("token:\n  default_ttl: 120\n")?;
    assert_eq!(config.token.default_ttl, 120);

    let error = Config::from_yaml_str("token:\n  default_ttl: -5\n").unwrap_err();
    assert!(error.to_string().contains("Configuration validation failed"));

    let error = Config::from_yaml_str("environments: {}\n").unwrap_err();
    assert!(error.to_string().contains("Configuration validation failed"));
    Ok(())
}

#[test]
fn test_check_schema() {
    assert!(check_schema(&serde_json::json!({ "environments": { "tt02": true } })).is_ok());
    assert!(check_schema(&serde_json::json!({ "environments": { "tt02": "yes" } })).is_err());
    assert!(check_schema(&serde_json::json!({ "certificates": { "directory": "" } })).is_err());
}
