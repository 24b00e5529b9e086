//! User identity: roles, email addresses, and registered accounts.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::PasswordHash;

/// Fixed set of roles a user can register as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Receives care; books appointments.
    Patient,
    /// Provides care; approves appointments and records treatments.
    Doctor,
    /// Administers the ward; removes appointments and manages billing.
    Staff,
}

impl Role {
    /// Canonical lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not one of the three variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be one of patient, doctor, or staff")]
pub struct InvalidRole;

impl std::str::FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "staff" => Ok(Self::Staff),
            _ => Err(InvalidRole),
        }
    }
}

/// Validation errors for [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Empty once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Surrounding whitespace is rejected rather than silently trimmed.
    #[error("email must not contain surrounding whitespace")]
    SurroundingWhitespace,
    /// No `@` separator present.
    #[error("email must contain an @ separator")]
    MissingAtSign,
}

/// Email address stored exactly as supplied.
///
/// Uniqueness checks elsewhere compare addresses case-sensitively; the
/// original system never folded case and changing that silently would
/// reject previously distinct registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(EmailValidationError::SurroundingWhitespace);
        }
        if !raw.contains('@') {
            return Err(EmailValidationError::MissingAtSign);
        }
        Ok(Self(raw))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Optional role-specific profile fields captured at registration.
///
/// All fields are optional; which ones are meaningful depends on the
/// user's role (address/age/gender/contact for patients, specialization
/// and qualification for doctors, qualification for staff).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Postal address (patients).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Age in years (patients).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u16>,
    /// Self-described gender (patients).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Contact phone number (patients).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Medical specialization (doctors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Professional qualification (doctors and staff).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    /// Date of joining the hospital (doctors and staff).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_joining: Option<NaiveDate>,
}

/// A registered account.
///
/// The id is assigned once at registration and never changes. The
/// password is held only as a salted one-way hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Stable identifier assigned at registration.
    pub id: Uuid,
    /// Unique login address.
    pub email: EmailAddress,
    /// Display name.
    pub name: String,
    /// Salted one-way password digest.
    pub password: PasswordHash,
    /// Role fixed at registration.
    pub role: Role,
    /// Optional role-specific fields.
    pub profile: Profile,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Register a new account with a freshly assigned id.
    pub fn register(
        role: Role,
        email: EmailAddress,
        name: String,
        password: PasswordHash,
        profile: Profile,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password,
            role,
            profile,
            created_at: Utc::now(),
        }
    }
}
