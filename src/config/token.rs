// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use serde::{Deserialize, Serialize};

/// Longest accepted token lifetime, one year
pub const MAX_TTL: u32 = 31_536_000;

/// Token issuance defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Lifetime in seconds applied when a request does not set one.
    ///
    /// Valid range is 1 to 31536000. Default is 1800 (30 minutes).
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,
}

fn default_ttl() -> u32 {
    1800
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
        }
    }
}
