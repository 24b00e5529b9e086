//! Login credentials and password hashing.
//!
//! Keep inbound payload parsing outside the domain by exposing
//! constructors that validate string inputs before a handler talks to a
//! repository or the token service.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty after trimming.
/// - `password` is non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Salted one-way password digest, encoded as `salt$digest` in hex.
///
/// The digest is `SHA-256(salt_bytes || password_bytes)` with a random
/// 16-byte salt per credential. Plaintext passwords are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

const SALT_LEN: usize = 16;

impl PasswordHash {
    /// Derive a hash for a new password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, password);
        Self(format!("{}${digest}", hex::encode(salt)))
    }

    /// Check a candidate password against the stored digest.
    ///
    /// Unparseable stored values fail closed.
    pub fn verify(&self, password: &str) -> bool {
        let Some((salt_hex, digest)) = self.0.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        Self::digest(&salt, password) == digest
    }

    fn digest(salt: &[u8], password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The encoded form is already one-way; printing it aids debugging
        // without exposing the password.
        f.write_str(&self.0)
    }
}
