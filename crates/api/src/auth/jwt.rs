//! Bearer-token validation.
//!
//! Tokens are minted by an external identity provider that shares the HS256
//! secret with this service. The only claim read here is `sub`, the owner id
//! every project lookup is scoped to; anything else the issuer adds is
//! ignored. [`sign_token`] exists for local tooling and tests.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use timetrack_core::types::DbId;

/// The claims this service cares about.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OwnerClaims {
    pub sub: DbId,
    /// Expiry, as a UTC Unix timestamp. Required.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// How incoming tokens are checked.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
    /// When set, a token's `iss` must equal this.
    pub issuer: Option<String>,
}

const DEFAULT_LEEWAY_SECS: u64 = 60;

impl JwtConfig {
    /// Load from the environment.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_LEEWAY_SECS` | no       | `60`    |
    /// | `JWT_ISSUER`      | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let leeway_secs: u64 = std::env::var("JWT_LEEWAY_SECS")
            .unwrap_or_else(|_| DEFAULT_LEEWAY_SECS.to_string())
            .parse()
            .expect("JWT_LEEWAY_SECS must be a valid u64");

        let issuer = std::env::var("JWT_ISSUER")
            .ok()
            .filter(|iss| !iss.trim().is_empty());

        Self {
            secret,
            leeway_secs,
            issuer,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.leeway = self.leeway_secs;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

/// Check signature, expiry and (if configured) issuer, and return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<OwnerClaims, jsonwebtoken::errors::Error> {
    let data = decode::<OwnerClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )?;
    Ok(data.claims)
}

/// Sign a token for `owner_id` valid for `ttl_secs`, carrying the configured issuer.
pub fn sign_token(
    owner_id: DbId,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = OwnerClaims {
        sub: owner_id,
        exp: chrono::Utc::now().timestamp() + ttl_secs,
        iss: config.issuer.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
