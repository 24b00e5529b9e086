//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise into all-optional structs so a missing
//! field produces a field-level error envelope instead of a serde 400
//! with an opaque message. These helpers build those envelopes.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::UserRepository;
use crate::domain::{Error, Role, User};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, reason: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} {reason}"))
        .with_value(ErrorCode::InvalidValue, value)
}

/// Unwrap a required field or produce the field-level error.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

/// Resolve a referenced user and check it has the expected role.
///
/// Unknown ids are `not_found`; an existing user of the wrong role is a
/// validation failure on the referencing field.
pub(crate) async fn require_user_with_role(
    users: &dyn UserRepository,
    id: Uuid,
    role: Role,
    field: FieldName,
) -> Result<User, Error> {
    let user = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("no user with id {id}")))?;
    if user.role != role {
        return Err(invalid_value_error(
            field,
            &id.to_string(),
            &format!("must reference a user with the {role} role"),
        ));
    }
    Ok(user)
}
