// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use thiserror::Error;

use crate::certificates::CertificateError;

/// Errors raised while validating requests, issuing or inspecting tokens
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown environment '{environment}'")]
    UnknownEnvironment { environment: String },

    #[error("Signing credential unavailable for environment '{environment}': {reason}")]
    CredentialUnavailable { environment: String, reason: String },

    #[error("Token signing failed: {reason}")]
    SigningFailure { reason: String },

    #[error("Malformed token: {reason}")]
    MalformedToken { reason: String },
}

impl TokenError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        TokenError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TokenError::MalformedToken {
            reason: reason.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            TokenError::InvalidInput { .. } => 2,
            TokenError::UnknownEnvironment { .. } => 3,
            TokenError::CredentialUnavailable { .. } => 4,
            TokenError::SigningFailure { .. } => 5,
            TokenError::MalformedToken { .. } => 6,
        }
    }
}

impl From<CertificateError> for TokenError {
    fn from(error: CertificateError) -> Self {
        match error {
            CertificateError::UnknownEnvironment { environment } => {
                TokenError::UnknownEnvironment { environment }
            }
            CertificateError::Unavailable {
                environment,
                reason,
            } => TokenError::CredentialUnavailable {
                environment,
                reason,
            },
        }
    }
}
