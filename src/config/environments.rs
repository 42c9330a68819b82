// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Environment catalog
//!
//! Environment names are used verbatim: in issuer URLs, as key file names
//! and for membership checks. Lookups are case-sensitive.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Known environment names, as accepted by request validation
pub trait EnvironmentCatalog {
    fn contains_environment(&self, env: &str) -> bool;
}

impl<V> EnvironmentCatalog for HashMap<String, V> {
    fn contains_environment(&self, env: &str) -> bool {
        self.contains_key(env)
    }
}

impl<V> EnvironmentCatalog for BTreeMap<String, V> {
    fn contains_environment(&self, env: &str) -> bool {
        self.contains_key(env)
    }
}

/// `environments` section: name to an opaque marker
///
/// Only the names matter. The boolean is kept for the YAML shape and is
/// never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentsConfig(pub BTreeMap<String, bool>);

impl EnvironmentsConfig {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for EnvironmentsConfig {
    fn default() -> Self {
        Self(
            ["at21", "at22", "tt02", "prod"]
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
        )
    }
}

impl EnvironmentCatalog for EnvironmentsConfig {
    fn contains_environment(&self, env: &str) -> bool {
        self.0.contains_key(env)
    }
}
