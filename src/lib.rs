// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Altinn test token library
//!
//! Issues RS256 signed test tokens for the Altinn platform in three flavors
//! (enterprise, enterprise-user and personal) and decodes them for
//! inspection.

pub mod certificates;
pub mod config;
pub mod token;
