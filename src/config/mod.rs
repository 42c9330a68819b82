// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the test token generator
//!
//! The configuration is backed by a YAML file and validated against an
//! embedded JSON schema before it is deserialized.
//!
//! ## Configuration Structure
//!
//! - `environments`: environments tokens may be issued for
//! - `certificates`: where the per-environment signing keys live
//! - `token`: issuance defaults such as the token lifetime
//!
//! ## Usage
//!
//! ```no_run
//! use altinn_test_tokens::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(Some("/etc/altinn/keys".into()), Some(600));
//!
//! println!("Default ttl: {}", config.token.default_ttl);
//! ```

pub mod certificates;
pub mod environments;
pub mod token;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use certificates::CertificatesConfig;
pub use environments::{EnvironmentCatalog, EnvironmentsConfig};
pub use token::{TokenConfig, MAX_TTL};
pub use utils::{check_schema, output_config_schema, validate_specific_rules};

/// Embedded JSON schema of the configuration file
pub const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Root configuration structure
///
/// Every section falls back to its defaults when missing from the file, so
/// an empty YAML document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Environments tokens may be issued for.
    #[serde(default)]
    pub environments: EnvironmentsConfig,

    /// Signing key location.
    #[serde(default)]
    pub certificates: CertificatesConfig,

    #[serde(default)]
    pub token: TokenConfig,
}

impl EnvironmentCatalog for Config {
    fn contains_environment(&self, env: &str) -> bool {
        self.environments.contains_environment(env)
    }
}

impl Config {
    /// Write a `*.sample.yaml` with default values next to a rejected file
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let sample_path = path.as_ref().with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file rejected by
    /// [`Config::from_yaml_str`] gets a sample file written next to it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        Self::from_yaml_str(&contents).inspect_err(|err| {
            error!("Rejected configuration at {:?}: {:#}", path, err);
            if let Err(e) = Self::create_sample_config(path) {
                error!("Failed to create sample config: {:#}", e);
            }
        })
    }

    /// Parse a YAML document into a checked configuration
    ///
    /// The document goes through the embedded schema, then serde, then
    /// [`validate_specific_rules`]. An empty document yields the defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let document: serde_yml::Value =
            serde_yml::from_str(contents).context("Failed to parse YAML configuration")?;

        let json_value = match serde_json::to_value(&document)
            .context("Failed to convert YAML to JSON for validation")?
        {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            value => value,
        };

        check_schema(&json_value)?;

        let config: Config =
            serde_json::from_value(json_value).context("Failed to deserialize configuration")?;
        validate_specific_rules(&config)?;

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line overrides
    ///
    /// # Parameters
    ///
    /// * `certificates_dir` - Directory holding the `<environment>.pem` keys
    /// * `default_ttl` - Token lifetime in seconds used when a request sets none
    pub fn apply_args(&mut self, certificates_dir: Option<PathBuf>, default_ttl: Option<u32>) {
        if let Some(directory) = certificates_dir {
            debug!(
                "Overriding certificates directory from command line: {:?}",
                directory
            );
            self.certificates.directory = directory;
        }

        if let Some(ttl) = default_ttl {
            debug!("Overriding default ttl from command line: {}", ttl);
            self.token.default_ttl = ttl;
        }
    }
}
