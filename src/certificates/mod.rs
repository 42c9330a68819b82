// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Signing Certificates
//!
//! The token issuer never owns key material. It asks a [`CertificateProvider`]
//! for a fresh [`SigningCredential`] on every issuance and drops it when the
//! token is signed.
//!
//! [`PemDirectoryStore`] is the provider used by the command line tool: one
//! RSA private key per environment, stored as `<environment>.pem`.

mod pem_store;

pub use pem_store::{thumbprint_of, PemDirectoryStore};

use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a certificate provider
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("No signing certificate for environment '{environment}'")]
    UnknownEnvironment { environment: String },

    #[error("Signing certificate for environment '{environment}' is unavailable: {reason}")]
    Unavailable { environment: String, reason: String },
}

/// Private key plus certificate metadata for one issuance
///
/// The key is held as PEM text (PKCS#1 or PKCS#8 RSA private key).
pub struct SigningCredential {
    private_key_pem: Vec<u8>,
    thumbprint: String,
}

impl SigningCredential {
    pub fn new(private_key_pem: impl Into<Vec<u8>>, thumbprint: impl Into<String>) -> Self {
        Self {
            private_key_pem: private_key_pem.into(),
            thumbprint: thumbprint.into(),
        }
    }

    pub fn private_key_pem(&self) -> &[u8] {
        &self.private_key_pem
    }

    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }
}

/// Keeps key material out of logs and error chains
impl std::fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredential")
            .field("private_key_pem", &"<redacted>")
            .field("thumbprint", &self.thumbprint)
            .finish()
    }
}

/// Source of signing credentials, keyed by environment name
#[async_trait]
pub trait CertificateProvider: Send + Sync {
    /// Fetch the signing credential for `environment`
    ///
    /// May perform network or disk I/O. Implementations decide whether to
    /// cache; callers request a fresh credential on every call.
    async fn get_signing_certificate(
        &self,
        environment: &str,
    ) -> Result<SigningCredential, CertificateError>;
}

#[async_trait]
impl<P: CertificateProvider + ?Sized> CertificateProvider for std::sync::Arc<P> {
    async fn get_signing_certificate(
        &self,
        environment: &str,
    ) -> Result<SigningCredential, CertificateError> {
        (**self).get_signing_certificate(environment).await
    }
}
