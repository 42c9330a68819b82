// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Test Token Core
//!
//! Validation of raw inputs, claim set construction for the three token
//! flavors, RS256 signing and unverified inspection.
//!
//! ```text
//! raw request --validate--> TokenParams --TokenIssuer::issue--> compact JWT
//!                                                                   |
//!                                              inspector::dump <----+
//! ```

pub mod claims;
pub mod error;
pub mod inspector;
pub mod issuer;
pub mod request;
pub mod validator;

pub use claims::{
    build_claims, ClaimSet, EnterpriseParams, EnterpriseUserParams, PersonalParams, TokenParams,
};
pub use error::TokenError;
pub use inspector::{decode, dump};
pub use issuer::{sign_claims, TokenIssuer, SIGNING_ALGORITHM};
pub use request::{EnterpriseRequest, EnterpriseUserRequest, PersonalRequest, ValidatedRequest};
