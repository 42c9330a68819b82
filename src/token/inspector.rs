// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Human readable token dump
//!
//! Decodes header and payload without looking at the signature. Useful for
//! checking what was issued, never for trusting a token.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde_json::Value;

use super::error::TokenError;

/// Restore `=` padding so the segment length is a multiple of 4
fn pad_segment(segment: &str) -> String {
    let mut padded = segment.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    padded
}

fn decode_segment(segment: &str, name: &str) -> Result<Value, TokenError> {
    let bytes = URL_SAFE
        .decode(pad_segment(segment))
        .map_err(|e| TokenError::malformed(format!("{} is not valid base64url: {}", name, e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::malformed(format!("{} is not valid JSON: {}", name, e)))
}

/// Decode header and payload of a compact token
///
/// The signature segment, if any, is ignored.
pub fn decode(token: &str) -> Result<(Value, Value), TokenError> {
    let mut segments = token.trim().split('.');
    let (header, payload) = match (segments.next(), segments.next()) {
        (Some(header), Some(payload)) => (header, payload),
        _ => return Err(TokenError::malformed("expected at least two dot separated segments")),
    };

    Ok((
        decode_segment(header, "header")?,
        decode_segment(payload, "payload")?,
    ))
}

/// Pretty print header and payload separated by a line holding a single `.`
pub fn dump(token: &str) -> Result<String, TokenError> {
    let (header, payload) = decode(token)?;
    let render = |value: &Value| {
        serde_json::to_string_pretty(value).map_err(|e| TokenError::malformed(e.to_string()))
    };
    Ok(format!("{}\n.\n{}", render(&header)?, render(&payload)?))
}
