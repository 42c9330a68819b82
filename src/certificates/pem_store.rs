// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Directory of PEM encoded RSA signing keys, one file per environment

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::{Digest, Sha256};
use rsa::{RsaPrivateKey, RsaPublicKey};

use super::{CertificateError, CertificateProvider, SigningCredential};

/// Thumbprint of a public key
///
/// Uppercase hex SHA-256 of the PKCS#1 DER encoding, so the same key gives
/// the same thumbprint whichever PEM flavor it was stored in.
pub fn thumbprint_of(public_key: &RsaPublicKey) -> Result<String, rsa::pkcs1::Error> {
    let der = public_key.to_pkcs1_der()?;
    Ok(Sha256::digest(der.as_bytes())
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect())
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| format!("not an RSA private key in PKCS#1 or PKCS#8 PEM form: {}", e))
}

/// Environment names map straight to file names
fn is_safe_file_stem(environment: &str) -> bool {
    !environment.is_empty()
        && !environment.starts_with('.')
        && !environment.contains(&['/', '\\'][..])
}

/// Certificate provider reading `<directory>/<environment>.pem`
#[derive(Debug, Clone)]
pub struct PemDirectoryStore {
    directory: PathBuf,
}

impl PemDirectoryStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the key file for an environment
    pub fn key_path(&self, environment: &str) -> PathBuf {
        self.directory.join(format!("{}.pem", environment))
    }
}

#[async_trait]
impl CertificateProvider for PemDirectoryStore {
    async fn get_signing_certificate(
        &self,
        environment: &str,
    ) -> Result<SigningCredential, CertificateError> {
        if !is_safe_file_stem(environment) {
            return Err(CertificateError::UnknownEnvironment {
                environment: environment.to_string(),
            });
        }

        let path = self.key_path(environment);
        debug!("Loading signing key for {} from {:?}", environment, path);

        let pem = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CertificateError::UnknownEnvironment {
                environment: environment.to_string(),
            },
            _ => CertificateError::Unavailable {
                environment: environment.to_string(),
                reason: format!("failed to read {:?}: {}", path, e),
            },
        })?;

        let unavailable = |reason: String| CertificateError::Unavailable {
            environment: environment.to_string(),
            reason,
        };

        let pem_text = std::str::from_utf8(&pem)
            .map_err(|e| unavailable(format!("key file is not UTF-8: {}", e)))?;
        let private_key = parse_private_key(pem_text).map_err(unavailable)?;
        let thumbprint = thumbprint_of(&RsaPublicKey::from(&private_key))
            .map_err(|e| unavailable(format!("failed to encode public key: {}", e)))?;

        Ok(SigningCredential::new(pem, thumbprint))
    }
}
