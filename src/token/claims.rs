// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Claim set assembly for the three token flavors
//!
//! Claims are assembled from already validated inputs. The issue time and
//! the random source are injected so that assembly stays a pure function
//! of its arguments.
//!
//! # Flavors
//!
//! - **Enterprise**: a system acting for an organization, authenticated
//!   through Maskinporten. No human user.
//! - **Enterprise user**: a named user acting through an organization's
//!   system (`virksomhetsbruker`).
//! - **Personal**: a natural person, no organization delegation.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{json, Map, Value};
use uuid::Builder;

/// Ordered claim name to value mapping
pub type ClaimSet = Map<String, Value>;

/// Value of the `actual_iss` claim on every token this tool issues
pub const ACTUAL_ISSUER: &str = "altinn-test-tools";

/// Authority used in organization claim objects
pub const ORG_AUTHORITY: &str = "iso6523-actorid-upis";

/// ISO 6523 ICD prefix for Norwegian organization numbers
pub const ORG_ID_PREFIX: &str = "0192:";

/// Length of the `jti` claim
pub const JTI_LENGTH: usize = 43;

const JTI_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-";

const AUTH_METHOD_MASKINPORTEN: &str = "maskinporten";
const AUTH_METHOD_ENTERPRISE_USER: &str = "virksomhetsbruker";
const AUTH_METHOD_PERSONAL: &str = "NotDefined";
const ENTERPRISE_AUTH_LEVEL: u8 = 3;

/// Inputs for an enterprise (system-to-system) token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseParams {
    pub scopes: Vec<String>,
    /// Organization code, e.g. `ttd`
    pub org: String,
    pub org_no: String,
    pub supplier_org_no: Option<String>,
    pub delegation_source: Option<String>,
}

/// Inputs for an enterprise-user token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseUserParams {
    pub scopes: Vec<String>,
    pub org: Option<String>,
    pub org_no: String,
    pub supplier_org_no: Option<String>,
    pub delegation_source: Option<String>,
    pub party_id: u32,
    pub user_id: u32,
    pub user_name: String,
}

/// Inputs for a personal (end user) token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalParams {
    pub scopes: Vec<String>,
    pub user_id: u32,
    pub party_id: u32,
    pub pid: String,
    /// "3" or "4"
    pub auth_level: String,
    pub consumer_org_no: String,
    pub user_name: String,
    pub client_amr: String,
}

/// Flavor-tagged claim inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenParams {
    Enterprise(EnterpriseParams),
    EnterpriseUser(EnterpriseUserParams),
    Personal(PersonalParams),
}

impl TokenParams {
    pub fn flavor(&self) -> &'static str {
        match self {
            TokenParams::Enterprise(_) => "enterprise",
            TokenParams::EnterpriseUser(_) => "enterprise-user",
            TokenParams::Personal(_) => "personal",
        }
    }
}

/// Issuer URL for an environment
///
/// Environments whose name starts with "at" (any case) live under
/// `altinn.cloud`, all others under `altinn.no`. The name itself is kept
/// as given.
pub fn issuer_for(env: &str) -> String {
    let tld = if env.to_lowercase().starts_with("at") {
        "cloud"
    } else {
        "no"
    };
    format!("https://platform.{}.altinn.{}/", env, tld)
}

/// Organization claim object for an organization number
pub fn org_no_object(org_no: &str) -> Value {
    json!({
        "authority": ORG_AUTHORITY,
        "ID": format!("{}{}", ORG_ID_PREFIX, org_no),
    })
}

/// Random `jti` value drawn uniformly from `[a-zA-Z0-9-]`
pub fn random_jti<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JTI_LENGTH)
        .map(|_| JTI_ALPHABET[rng.random_range(0..JTI_ALPHABET.len())] as char)
        .collect()
}

/// Random version 4 UUID, hyphenated
pub fn random_client_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    Builder::from_random_bytes(rng.random())
        .into_uuid()
        .hyphenated()
        .to_string()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn insert(claims: &mut ClaimSet, name: &str, value: Value) {
    claims.insert(name.to_string(), value);
}

/// Timestamps and identifiers shared by every flavor of one issuance
struct Stamp<'a> {
    issuer: &'a str,
    iat: i64,
    exp: i64,
    client_id: String,
}

/// Build the complete claim set for one token
///
/// `exp` is `issued_at + ttl` and `nbf` equals `iat`. Optional string
/// inputs that are empty are treated as absent.
pub fn build_claims<R: Rng + ?Sized>(
    params: &TokenParams,
    issuer: &str,
    issued_at: DateTime<Utc>,
    ttl: u32,
    rng: &mut R,
) -> ClaimSet {
    let iat = issued_at.timestamp();
    let stamp = Stamp {
        issuer,
        iat,
        exp: iat + i64::from(ttl),
        client_id: random_client_id(rng),
    };

    match params {
        TokenParams::Enterprise(p) => {
            let mut claims = enterprise_head(&stamp, &p.scopes);
            insert(&mut claims, "jti", json!(random_jti(rng)));
            insert(&mut claims, "consumer", org_no_object(&p.org_no));
            insert(&mut claims, "urn:altinn:org", json!(p.org));
            enterprise_tail(
                &mut claims,
                &stamp,
                &p.org_no,
                AUTH_METHOD_MASKINPORTEN,
                None,
                &p.supplier_org_no,
                &p.delegation_source,
            );
            claims
        }
        TokenParams::EnterpriseUser(p) => {
            let mut claims = enterprise_head(&stamp, &p.scopes);
            insert(&mut claims, "consumer", org_no_object(&p.org_no));
            insert(&mut claims, "jti", json!(random_jti(rng)));
            insert(&mut claims, "urn:altinn:userid", json!(p.user_id));
            insert(&mut claims, "urn:altinn:username", json!(p.user_name));
            insert(&mut claims, "urn:altinn:partyid", json!(p.party_id));
            enterprise_tail(
                &mut claims,
                &stamp,
                &p.org_no,
                AUTH_METHOD_ENTERPRISE_USER,
                present(&p.org),
                &p.supplier_org_no,
                &p.delegation_source,
            );
            claims
        }
        TokenParams::Personal(p) => personal_claims(&stamp, p),
    }
}

fn enterprise_head(stamp: &Stamp<'_>, scopes: &[String]) -> ClaimSet {
    let mut claims = ClaimSet::new();
    insert(&mut claims, "scope", json!(scopes.join(" ")));
    insert(&mut claims, "token_type", json!("Bearer"));
    insert(&mut claims, "exp", json!(stamp.exp));
    insert(&mut claims, "iat", json!(stamp.iat));
    insert(&mut claims, "client_id", json!(stamp.client_id));
    claims
}

fn enterprise_tail(
    claims: &mut ClaimSet,
    stamp: &Stamp<'_>,
    org_no: &str,
    method: &str,
    trailing_org: Option<&str>,
    supplier_org_no: &Option<String>,
    delegation_source: &Option<String>,
) {
    insert(claims, "urn:altinn:orgNumber", json!(org_no));
    insert(claims, "urn:altinn:authenticatemethod", json!(method));
    insert(claims, "urn:altinn:authlevel", json!(ENTERPRISE_AUTH_LEVEL));
    insert(claims, "iss", json!(stamp.issuer));
    insert(claims, "actual_iss", json!(ACTUAL_ISSUER));
    insert(claims, "nbf", json!(stamp.iat));

    if let Some(org) = trailing_org {
        insert(claims, "urn:altinn:org", json!(org));
    }

    if let Some(supplier) = present(supplier_org_no) {
        insert(claims, "supplier", org_no_object(supplier));
    }
    if let Some(source) = present(delegation_source) {
        insert(claims, "delegation_source", json!(source));
    }
}

fn personal_claims(stamp: &Stamp<'_>, p: &PersonalParams) -> ClaimSet {
    let mut claims = ClaimSet::new();
    insert(&mut claims, "nameid", json!(p.user_id));
    insert(&mut claims, "urn:altinn:userid", json!(p.user_id));
    insert(&mut claims, "urn:altinn:username", json!(p.user_name));
    insert(&mut claims, "urn:altinn:partyid", json!(p.party_id));
    insert(&mut claims, "urn:altinn:authenticatemethod", json!(AUTH_METHOD_PERSONAL));
    insert(&mut claims, "urn:altinn:authlevel", json!(p.auth_level));
    insert(&mut claims, "client_amr", json!(p.client_amr));
    insert(&mut claims, "pid", json!(p.pid));
    insert(&mut claims, "token_type", json!("Bearer"));
    insert(&mut claims, "client_id", json!(stamp.client_id));
    insert(&mut claims, "acr", json!(format!("Level{}", p.auth_level)));
    insert(&mut claims, "scope", json!(p.scopes.join(" ")));
    insert(&mut claims, "exp", json!(stamp.exp));
    insert(&mut claims, "iat", json!(stamp.iat));
    insert(&mut claims, "client_orgno", json!(p.consumer_org_no));
    insert(&mut claims, "consumer", org_no_object(&p.consumer_org_no));
    insert(&mut claims, "iss", json!(stamp.issuer));
    insert(&mut claims, "actual_iss", json!(ACTUAL_ISSUER));
    insert(&mut claims, "nbf", json!(stamp.iat));
    claims
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn enterprise() -> EnterpriseParams {
        EnterpriseParams {
            scopes: vec!["altinn:serviceowner/instances.read".to_string()],
            org: "ttd".to_string(),
            org_no: "991825827".to_string(),
            supplier_org_no: None,
            delegation_source: None,
        }
    }

    fn enterprise_user() -> EnterpriseUserParams {
        EnterpriseUserParams {
            scopes: vec!["altinn:enduser".to_string()],
            org: None,
            org_no: "991825827".to_string(),
            supplier_org_no: None,
            delegation_source: None,
            party_id: 50002108,
            user_id: 1337,
            user_name: "testbruker".to_string(),
        }
    }

    fn personal() -> PersonalParams {
        PersonalParams {
            scopes: vec!["altinn:enduser".to_string(), "altinn:instances.read".to_string()],
            user_id: 20000001,
            party_id: 50000001,
            pid: "01017012345".to_string(),
            auth_level: "4".to_string(),
            consumer_org_no: "910075918".to_string(),
            user_name: "".to_string(),
            client_amr: "virksomhetssertifikat".to_string(),
        }
    }

    fn build(params: TokenParams, env: &str, ttl: u32) -> ClaimSet {
        let mut rng = StdRng::seed_from_u64(7);
        build_claims(&params, &issuer_for(env), issued_at(), ttl, &mut rng)
    }

    fn keys(claims: &ClaimSet) -> Vec<&str> {
        claims.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_issuer_for() {
        assert_eq!(issuer_for("at21"), "https://platform.at21.altinn.cloud/");
        assert_eq!(issuer_for("AT22"), "https://platform.AT22.altinn.cloud/");
        assert_eq!(issuer_for("tt02"), "https://platform.tt02.altinn.no/");
        assert_eq!(issuer_for("prod"), "https://platform.prod.altinn.no/");
        assert_eq!(issuer_for("yt01"), "https://platform.yt01.altinn.no/");
    }

    #[test]
    fn test_org_no_object() {
        assert_eq!(
            org_no_object("910075918"),
            json!({ "authority": "iso6523-actorid-upis", "ID": "0192:910075918" })
        );
    }

    #[test]
    fn test_random_jti_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = random_jti(&mut rng);
        let second = random_jti(&mut rng);
        assert_eq!(first.len(), JTI_LENGTH);
        assert!(first.bytes().all(|b| JTI_ALPHABET.contains(&b)));
        assert_ne!(first, second);
    }

    #[test]
    fn test_random_client_id_is_uuid_v4() {
        let mut rng = StdRng::seed_from_u64(42);
        let client_id = random_client_id(&mut rng);
        let parsed = uuid::Uuid::parse_str(&client_id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(client_id.len(), 36);
    }

    #[test]
    fn test_enterprise_required_claims() {
        let claims = build(TokenParams::Enterprise(enterprise()), "tt02", 1800);

        assert_eq!(
            keys(&claims),
            vec![
                "scope",
                "token_type",
                "exp",
                "iat",
                "client_id",
                "jti",
                "consumer",
                "urn:altinn:org",
                "urn:altinn:orgNumber",
                "urn:altinn:authenticatemethod",
                "urn:altinn:authlevel",
                "iss",
                "actual_iss",
                "nbf",
            ]
        );
        assert_eq!(claims["scope"], "altinn:serviceowner/instances.read");
        assert_eq!(claims["urn:altinn:org"], "ttd");
        assert_eq!(claims["urn:altinn:authenticatemethod"], "maskinporten");
        assert_eq!(claims["urn:altinn:authlevel"], 3);
        assert_eq!(claims["iss"], "https://platform.tt02.altinn.no/");
        assert_eq!(claims["consumer"], org_no_object("991825827"));
    }

    #[test]
    fn test_enterprise_optional_claims() {
        let claims = build(TokenParams::Enterprise(enterprise()), "tt02", 60);
        assert!(!claims.contains_key("supplier"));
        assert!(!claims.contains_key("delegation_source"));

        let mut params = enterprise();
        params.supplier_org_no = Some("310090915".to_string());
        params.delegation_source = Some("https://example.com/delegations/1".to_string());
        let claims = build(TokenParams::Enterprise(params), "tt02", 60);
        assert_eq!(claims["supplier"], org_no_object("310090915"));
        assert_eq!(claims["delegation_source"], "https://example.com/delegations/1");

        let mut params = enterprise();
        params.supplier_org_no = Some(String::new());
        let claims = build(TokenParams::Enterprise(params), "tt02", 60);
        assert!(!claims.contains_key("supplier"));
    }

    #[test]
    fn test_enterprise_user_claims() {
        let claims = build(TokenParams::EnterpriseUser(enterprise_user()), "at22", 300);

        assert_eq!(claims["urn:altinn:authenticatemethod"], "virksomhetsbruker");
        assert_eq!(claims["urn:altinn:userid"], 1337);
        assert_eq!(claims["urn:altinn:username"], "testbruker");
        assert_eq!(claims["urn:altinn:partyid"], 50002108);
        assert_eq!(claims["urn:altinn:orgNumber"], "991825827");
        assert_eq!(claims["urn:altinn:authlevel"], 3);
        assert_eq!(claims["iss"], "https://platform.at22.altinn.cloud/");
        assert!(claims.contains_key("jti"));
        assert!(!claims.contains_key("urn:altinn:org"));

        let mut params = enterprise_user();
        params.org = Some("digdir".to_string());
        params.supplier_org_no = Some("310090915".to_string());
        params.delegation_source = Some("https://example.com/delegations/7".to_string());
        let claims = build(TokenParams::EnterpriseUser(params), "at22", 300);
        assert_eq!(claims["urn:altinn:org"], "digdir");
        assert_eq!(
            keys(&claims),
            vec![
                "scope",
                "token_type",
                "exp",
                "iat",
                "client_id",
                "consumer",
                "jti",
                "urn:altinn:userid",
                "urn:altinn:username",
                "urn:altinn:partyid",
                "urn:altinn:orgNumber",
                "urn:altinn:authenticatemethod",
                "urn:altinn:authlevel",
                "iss",
                "actual_iss",
                "nbf",
                "urn:altinn:org",
                "supplier",
                "delegation_source",
            ]
        );
    }

    #[test]
    fn test_personal_claims() {
        let claims = build(TokenParams::Personal(personal()), "at21", 1800);

        assert_eq!(
            keys(&claims),
            vec![
                "nameid",
                "urn:altinn:userid",
                "urn:altinn:username",
                "urn:altinn:partyid",
                "urn:altinn:authenticatemethod",
                "urn:altinn:authlevel",
                "client_amr",
                "pid",
                "token_type",
                "client_id",
                "acr",
                "scope",
                "exp",
                "iat",
                "client_orgno",
                "consumer",
                "iss",
                "actual_iss",
                "nbf",
            ]
        );
        assert_eq!(claims["nameid"], 20000001);
        assert_eq!(claims["urn:altinn:authlevel"], "4");
        assert_eq!(claims["acr"], "Level4");
        assert_eq!(claims["urn:altinn:authenticatemethod"], "NotDefined");
        assert_eq!(claims["scope"], "altinn:enduser altinn:instances.read");
        assert_eq!(claims["client_orgno"], "910075918");
        assert_eq!(claims["consumer"], org_no_object("910075918"));
    }

    #[test]
    fn test_time_claims_for_every_flavor() {
        let flavors = vec![
            TokenParams::Enterprise(enterprise()),
            TokenParams::EnterpriseUser(enterprise_user()),
            TokenParams::Personal(personal()),
        ];

        for params in flavors {
            let claims = build(params, "tt02", 3600);
            let iat = claims["iat"].as_i64().unwrap();
            assert_eq!(iat, issued_at().timestamp());
            assert_eq!(claims["exp"].as_i64().unwrap() - iat, 3600);
            assert_eq!(claims["nbf"], claims["iat"]);
            assert_eq!(claims["token_type"], "Bearer");
            assert_eq!(claims["actual_iss"], ACTUAL_ISSUER);
        }
    }

    #[test]
    fn test_flavor_names() {
        assert_eq!(TokenParams::Enterprise(enterprise()).flavor(), "enterprise");
        assert_eq!(
            TokenParams::EnterpriseUser(enterprise_user()).flavor(),
            "enterprise-user"
        );
        assert_eq!(TokenParams::Personal(personal()).flavor(), "personal");
    }
}
