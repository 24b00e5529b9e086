//! Session token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs carrying `{sub, role, exp}`. There is
//! no revocation list: a token stays valid until its embedded expiry even
//! if the account changes afterwards.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::Error;
use super::user::{Role, User};

/// Default token lifetime: seven days from issuance.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Decoded token payload exposed to guarded handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub sub: Uuid,
    /// Role fixed at registration.
    pub role: Role,
    /// Expiry as a unix timestamp, validated on every request.
    pub exp: i64,
}

/// Issues and verifies signed session tokens with a process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Build a service from the configured secret with the default
    /// seven-day lifetime.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    /// Build a service with an explicit token lifetime.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for an authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, Error> {
        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Verify a token string and return its claims.
    ///
    /// All failures surface as `unauthorized` with a reason the client
    /// can act on; the underlying decode error is never fatal.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => Error::unauthorized("token expired"),
                ErrorKind::InvalidSignature => Error::unauthorized("token signature invalid"),
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => Error::unauthorized("token malformed"),
                _ => Error::unauthorized(format!("token invalid: {err}")),
            })
    }
}
