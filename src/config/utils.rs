// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! Schema output and the checks the JSON schema cannot express.

use anyhow::{Context, Result};
use log::debug;

use super::{Config, CONFIG_SCHEMA, MAX_TTL};

/// Output the embedded JSON schema to the console.
///
/// Called when the `--show-config-schema` flag is provided on the command
/// line.
///
/// # Example
///
/// ```bash
/// ./altinn-test-tokens --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Validate a configuration document against the embedded JSON schema
pub fn check_schema(document: &serde_json::Value) -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
    let validator = jsonschema::draft202012::options()
        .should_validate_formats(true)
        .build(&schema)?;

    debug!("Validating configuration against schema");
    validator
        .validate(document)
        .map_err(|error| anyhow::anyhow!("Configuration validation failed: {}", error))
}

/// Environment names end up in file names and issuer URLs
fn is_valid_environment_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains(&['/', '\\'][..])
        && !name.chars().any(char::is_whitespace)
}

/// Validates the configuration against rules the JSON schema does not cover.
///
/// # Validation Rules
///
/// - **Environments**: at least one environment is listed and every name is
///   usable as a file name (non-empty, no path separator, no `..`, no
///   whitespace)
/// - **Token lifetime**: `default_ttl` is between 1 and 31536000 seconds
/// - **Certificates**: the key directory path is not empty
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if config.environments.is_empty() {
        anyhow::bail!("At least one environment must be configured");
    }

    for name in config.environments.names() {
        if !is_valid_environment_name(name) {
            anyhow::bail!("Invalid environment name: {:?}", name);
        }
    }

    if config.token.default_ttl < 1 || config.token.default_ttl > MAX_TTL {
        anyhow::bail!(
            "Invalid default ttl: {} (expected 1 to {} seconds)",
            config.token.default_ttl,
            MAX_TTL
        );
    }

    if config.certificates.directory.as_os_str().is_empty() {
        anyhow::bail!("Certificates directory must not be empty");
    }

    Ok(())
}
