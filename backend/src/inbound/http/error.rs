//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and
//! status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        // Duplicate registrations have always surfaced as a plain bad
        // request, so `conflict` keeps that status on the wire.
        ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::conflict("email taken"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("nope"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn domain_errors_map_to_expected_statuses(#[case] err: Error, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[rstest]
    fn internal_errors_are_redacted_in_the_body() {
        let response = Error::internal("database exploded at line 42").error_response();
        let body = actix_web::body::to_bytes_limited(response.into_body(), 4096);
        let bytes = futures_executor::block_on(body)
            .expect("body within limit")
            .expect("body read");
        let value: Value = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(value["message"], "Internal server error");
        assert_eq!(value["code"], "internal_error");
    }

    #[rstest]
    fn non_internal_errors_keep_their_message() {
        let response = Error::not_found("bill abc not found").error_response();
        let body = actix_web::body::to_bytes_limited(response.into_body(), 4096);
        let bytes = futures_executor::block_on(body)
            .expect("body within limit")
            .expect("body read");
        let value: Value = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(value["message"], "bill abc not found");
    }
}
