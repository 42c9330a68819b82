// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Raw token requests and their validation
//!
//! Front ends collect untrusted strings into one of the request types below
//! and call `validate`. On success they get the environment, the typed
//! [`TokenParams`] ready for [`crate::token::TokenIssuer::issue`] and the
//! effective time to live.

use serde::{Deserialize, Serialize};

use super::claims::{EnterpriseParams, EnterpriseUserParams, PersonalParams, TokenParams};
use super::error::TokenError;
use super::validator::{
    is_valid_absolute_uri, is_valid_auth_level, is_valid_environment, is_valid_identifier,
    is_valid_org_no, is_valid_pid, parse_scopes,
};
use crate::config::EnvironmentCatalog;

/// Validated request: environment, claim parameters and ttl in seconds
pub type ValidatedRequest = (String, TokenParams, u32);

/// Request for an enterprise (organization) token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnterpriseRequest {
    pub env: String,
    pub scopes: String,
    pub org: String,
    pub org_no: String,
    pub supplier_org_no: Option<String>,
    pub ttl: Option<u32>,
    pub delegation_source: Option<String>,
}

/// Request for an enterprise token acting on behalf of a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnterpriseUserRequest {
    pub env: String,
    pub scopes: String,
    pub org: Option<String>,
    pub org_no: String,
    pub supplier_org_no: Option<String>,
    pub party_id: String,
    pub user_id: String,
    pub user_name: String,
    pub ttl: Option<u32>,
    pub delegation_source: Option<String>,
}

/// Request for a personal (end user) token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalRequest {
    pub env: String,
    pub scopes: String,
    pub user_id: String,
    pub party_id: String,
    pub pid: String,
    pub auth_lvl: String,
    pub consumer_org_no: String,
    pub user_name: String,
    pub client_amr: String,
    pub ttl: Option<u32>,
}

/// Empty optional strings count as absent
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn check_env<C: EnvironmentCatalog + ?Sized>(env: &str, catalog: &C) -> Result<(), TokenError> {
    if is_valid_environment(env, catalog) {
        Ok(())
    } else {
        Err(TokenError::invalid_input(
            "env",
            format!("'{}' is not a configured environment", env),
        ))
    }
}

fn check_scopes(scopes: &str) -> Result<Vec<String>, TokenError> {
    parse_scopes(scopes).ok_or_else(|| {
        TokenError::invalid_input(
            "scopes",
            "expected lowercase scopes separated by commas or spaces, at most 200 characters",
        )
    })
}

fn check_org(org: &str) -> Result<String, TokenError> {
    if is_valid_identifier(org) {
        Ok(org.to_string())
    } else {
        Err(TokenError::invalid_input(
            "org",
            "expected 1 to 50 lowercase letters",
        ))
    }
}

fn check_org_no(field: &str, org_no: &str) -> Result<String, TokenError> {
    if is_valid_org_no(org_no) {
        Ok(org_no.to_string())
    } else {
        Err(TokenError::invalid_input(field, "expected exactly 9 digits"))
    }
}

fn check_optional_org_no(field: &str, org_no: &Option<String>) -> Result<Option<String>, TokenError> {
    non_empty(org_no)
        .map(|value| check_org_no(field, value))
        .transpose()
}

fn check_delegation_source(source: &Option<String>) -> Result<Option<String>, TokenError> {
    match non_empty(source) {
        Some(uri) if is_valid_absolute_uri(uri) => Ok(Some(uri.to_string())),
        Some(_) => Err(TokenError::invalid_input(
            "delegation_source",
            "expected an absolute URI",
        )),
        None => Ok(None),
    }
}

fn check_id(field: &str, value: &str) -> Result<u32, TokenError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| TokenError::invalid_input(field, "expected an unsigned 32-bit integer"))
}

fn check_required(field: &str, value: &str) -> Result<String, TokenError> {
    if value.is_empty() {
        Err(TokenError::invalid_input(field, "must not be empty"))
    } else {
        Ok(value.to_string())
    }
}

fn resolve_ttl(ttl: Option<u32>, default_ttl: u32) -> Result<u32, TokenError> {
    match ttl {
        Some(0) => Err(TokenError::invalid_input(
            "ttl",
            "must be at least one second",
        )),
        Some(ttl) => Ok(ttl),
        None => Ok(default_ttl),
    }
}

impl EnterpriseRequest {
    pub fn validate<C: EnvironmentCatalog + ?Sized>(
        &self,
        catalog: &C,
        default_ttl: u32,
    ) -> Result<ValidatedRequest, TokenError> {
        check_env(&self.env, catalog)?;
        let params = EnterpriseParams {
            scopes: check_scopes(&self.scopes)?,
            org: check_org(&self.org)?,
            org_no: check_org_no("org_no", &self.org_no)?,
            supplier_org_no: check_optional_org_no("supplier_org_no", &self.supplier_org_no)?,
            delegation_source: check_delegation_source(&self.delegation_source)?,
        };
        let ttl = resolve_ttl(self.ttl, default_ttl)?;

        Ok((self.env.clone(), TokenParams::Enterprise(params), ttl))
    }
}

impl EnterpriseUserRequest {
    pub fn validate<C: EnvironmentCatalog + ?Sized>(
        &self,
        catalog: &C,
        default_ttl: u32,
    ) -> Result<ValidatedRequest, TokenError> {
        check_env(&self.env, catalog)?;
        let params = EnterpriseUserParams {
            scopes: check_scopes(&self.scopes)?,
            org: non_empty(&self.org).map(check_org).transpose()?,
            org_no: check_org_no("org_no", &self.org_no)?,
            supplier_org_no: check_optional_org_no("supplier_org_no", &self.supplier_org_no)?,
            delegation_source: check_delegation_source(&self.delegation_source)?,
            party_id: check_id("party_id", &self.party_id)?,
            user_id: check_id("user_id", &self.user_id)?,
            user_name: check_required("user_name", &self.user_name)?,
        };
        let ttl = resolve_ttl(self.ttl, default_ttl)?;

        Ok((self.env.clone(), TokenParams::EnterpriseUser(params), ttl))
    }
}

impl PersonalRequest {
    pub fn validate<C: EnvironmentCatalog + ?Sized>(
        &self,
        catalog: &C,
        default_ttl: u32,
    ) -> Result<ValidatedRequest, TokenError> {
        check_env(&self.env, catalog)?;

        if !is_valid_pid(&self.pid) {
            return Err(TokenError::invalid_input("pid", "expected exactly 11 digits"));
        }
        if !is_valid_auth_level(&self.auth_lvl) {
            return Err(TokenError::invalid_input("auth_lvl", "expected 3 or 4"));
        }

        let params = PersonalParams {
            scopes: check_scopes(&self.scopes)?,
            user_id: check_id("user_id", &self.user_id)?,
            party_id: check_id("party_id", &self.party_id)?,
            pid: self.pid.clone(),
            auth_level: self.auth_lvl.clone(),
            consumer_org_no: check_org_no("consumer_org_no", &self.consumer_org_no)?,
            user_name: check_required("user_name", &self.user_name)?,
            client_amr: check_required("client_amr", &self.client_amr)?,
        };
        let ttl = resolve_ttl(self.ttl, default_ttl)?;

        Ok((self.env.clone(), TokenParams::Personal(params), ttl))
    }
}
