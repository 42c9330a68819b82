// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Input validation predicates
//!
//! Every predicate is total: it never fails and never panics, it only
//! answers whether a raw string is acceptable. Callers run these before
//! handing values to the token issuer, which does not check again.

use url::Url;

use crate::config::EnvironmentCatalog;

/// Maximum accepted length of a raw scope list
pub const MAX_SCOPE_LIST_LENGTH: usize = 200;

/// Maximum accepted length of an identifier such as an org code
pub const MAX_IDENTIFIER_LENGTH: usize = 50;

fn is_scope_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | ':' | '/' | '_' | '-' | ',' | '.' | ' ')
}

fn is_digits(s: &str, count: usize) -> bool {
    s.len() == count && s.bytes().all(|b| b.is_ascii_digit())
}

/// Check a raw, comma or space delimited scope list
pub fn is_valid_scope_list(input: &str) -> bool {
    !input.is_empty() && input.len() <= MAX_SCOPE_LIST_LENGTH && input.chars().all(is_scope_char)
}

/// Split a scope list into individual scopes
///
/// Commas count as separators and empty entries are dropped. Order and
/// duplicates are kept as given. Returns `None` when the input does not
/// pass [`is_valid_scope_list`], so an invalid list is never parsed.
pub fn parse_scopes(input: &str) -> Option<Vec<String>> {
    if !is_valid_scope_list(input) {
        return None;
    }

    Some(
        input
            .replace(',', " ")
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    )
}

/// Lowercase ASCII letters only, 1 to 50 characters
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_IDENTIFIER_LENGTH && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// Organization number: exactly 9 digits
pub fn is_valid_org_no(s: &str) -> bool {
    is_digits(s, 9)
}

/// National person identifier: exactly 11 digits
pub fn is_valid_pid(s: &str) -> bool {
    is_digits(s, 11)
}

/// Authentication level: "3" or "4"
pub fn is_valid_auth_level(s: &str) -> bool {
    matches!(s, "3" | "4")
}

/// Case-sensitive membership test against the configured environments
pub fn is_valid_environment<C: EnvironmentCatalog + ?Sized>(env: &str, catalog: &C) -> bool {
    catalog.contains_environment(env)
}

/// Well-formed absolute URI
pub fn is_valid_absolute_uri(s: &str) -> bool {
    Url::parse(s).is_ok()
}
