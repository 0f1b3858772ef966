//! Stateless session tokens.
//!
//! The token carries the caller's identity, role and company so every
//! request can be scoped without a server-side session store. Verification
//! never errors through: anything short of a well-formed, correctly signed,
//! unexpired token is simply invalid.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub company: String,
    pub team: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        id: i64,
        username: String,
        role: String,
        company: String,
        team: Option<String>,
        expiry_secs: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            role,
            company,
            team,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        }
    }
}

/// Sign the claims with the shared secret (HS256).
pub fn issue(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry. `None` covers every failure mode:
/// malformed token, wrong secret, expired.
pub fn verify(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}
