// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token issuance and signing
//!
//! One issuance resolves the current time, fetches a signing credential for
//! the environment, builds the claim set for the requested flavor and signs
//! header and payload with RS256. Inputs are expected to be validated
//! already (see [`crate::token::request`]).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey};
use log::debug;
use serde::Serialize;

use super::claims::{
    build_claims, issuer_for, ClaimSet, EnterpriseParams, EnterpriseUserParams, PersonalParams,
    TokenParams,
};
use super::error::TokenError;
use crate::certificates::{CertificateProvider, SigningCredential};

/// Signature algorithm of every issued token
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// JOSE header of issued tokens
///
/// `x5c` carries the certificate thumbprint as a plain string instead of a
/// certificate chain. Consumers of these test tokens rely on that shape.
#[derive(Debug, Serialize)]
struct TokenHeader<'a> {
    alg: Algorithm,
    kid: &'a str,
    typ: &'static str,
    x5c: &'a str,
}

/// Sign a claim set with a credential and return the compact token
pub fn sign_claims(claims: &ClaimSet, credential: &SigningCredential) -> Result<String, TokenError> {
    let header = TokenHeader {
        alg: SIGNING_ALGORITHM,
        kid: credential.thumbprint(),
        typ: "JWT",
        x5c: credential.thumbprint(),
    };

    let header_json = serde_json::to_vec(&header).map_err(|e| TokenError::SigningFailure {
        reason: format!("header serialization: {}", e),
    })?;
    let payload_json = serde_json::to_vec(claims).map_err(|e| TokenError::SigningFailure {
        reason: format!("payload serialization: {}", e),
    })?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(payload_json)
    );

    let key = EncodingKey::from_rsa_pem(credential.private_key_pem()).map_err(|e| {
        TokenError::SigningFailure {
            reason: format!("invalid RSA private key: {}", e),
        }
    })?;
    let signature = jsonwebtoken::crypto::sign(signing_input.as_bytes(), &key, SIGNING_ALGORITHM)
        .map_err(|e| TokenError::SigningFailure {
            reason: e.to_string(),
        })?;

    Ok(format!("{}.{}", signing_input, signature))
}

/// Issues signed test tokens using credentials from a [`CertificateProvider`]
pub struct TokenIssuer<P> {
    provider: P,
}

impl<P: CertificateProvider> TokenIssuer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Issue a token of any flavor for `env`, valid for `ttl` seconds
    ///
    /// # Errors
    ///
    /// * `UnknownEnvironment` - the provider has no certificate for `env`
    /// * `CredentialUnavailable` - the provider failed to produce one
    /// * `SigningFailure` - the credential could not sign the token
    pub async fn issue(
        &self,
        env: &str,
        params: &TokenParams,
        ttl: u32,
    ) -> Result<String, TokenError> {
        let issued_at = Utc::now();
        let credential = self.provider.get_signing_certificate(env).await?;

        let claims = {
            let mut rng = rand::rng();
            build_claims(params, &issuer_for(env), issued_at, ttl, &mut rng)
        };
        debug!(
            "Issuing {} token for {} (jti: {}, ttl: {}s)",
            params.flavor(),
            env,
            claims.get("jti").and_then(|v| v.as_str()).unwrap_or("-"),
            ttl
        );

        sign_claims(&claims, &credential)
    }

    pub async fn issue_enterprise(
        &self,
        env: &str,
        params: EnterpriseParams,
        ttl: u32,
    ) -> Result<String, TokenError> {
        self.issue(env, &TokenParams::Enterprise(params), ttl).await
    }

    pub async fn issue_enterprise_user(
        &self,
        env: &str,
        params: EnterpriseUserParams,
        ttl: u32,
    ) -> Result<String, TokenError> {
        self.issue(env, &TokenParams::EnterpriseUser(params), ttl)
            .await
    }

    pub async fn issue_personal(
        &self,
        env: &str,
        params: PersonalParams,
        ttl: u32,
    ) -> Result<String, TokenError> {
        self.issue(env, &TokenParams::Personal(params), ttl).await
    }
}
