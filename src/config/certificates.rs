// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of the signing keys
///
/// The directory holds one PEM encoded RSA private key per environment,
/// named `<environment>.pem`. Keys can be generated with `signing_keygen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificatesConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

fn default_directory() -> PathBuf {
    PathBuf::from("./certificates")
}

impl Default for CertificatesConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}
