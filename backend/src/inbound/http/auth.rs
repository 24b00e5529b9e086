//! Bearer-token authentication context for guarded handlers.
//!
//! Handlers take an [`AuthContext`] parameter and actix resolves it from
//! the `Authorization: Bearer <token>` header before the handler body
//! runs, so business code never touches raw headers. Verification
//! failures surface as `401 unauthorized`; role checks are explicit
//! per-operation calls returning `403 forbidden`.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::{Error, Role};
use crate::inbound::http::state::HttpState;

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Id of the authenticated user.
    pub user_id: Uuid,
    /// Role embedded in the verified token.
    pub role: Role,
}

impl AuthContext {
    /// Require exactly `role`, otherwise `403`.
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "this operation requires the {role} role"
            )))
        }
    }

    /// Require any of `roles`, otherwise `403`.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), Error> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            let allowed = roles
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(" or ");
            Err(Error::forbidden(format!(
                "this operation requires the {allowed} role"
            )))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing Authorization header"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Authorization header is not valid UTF-8"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Authorization header must use the Bearer scheme"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthContext, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let token = bearer_token(req)?;
    let claims = state.tokens.verify(token)?;
    Ok(AuthContext {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[rstest]
    fn matching_role_passes() {
        assert!(context(Role::Doctor).require_role(Role::Doctor).is_ok());
    }

    #[rstest]
    #[case(Role::Patient)]
    #[case(Role::Staff)]
    fn other_roles_are_forbidden(#[case] role: Role) {
        let err = context(role)
            .require_role(Role::Doctor)
            .expect_err("must be rejected");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }

    #[rstest]
    fn require_any_accepts_each_listed_role() {
        for role in [Role::Patient, Role::Staff] {
            assert!(
                context(role)
                    .require_any(&[Role::Patient, Role::Staff])
                    .is_ok()
            );
        }
        assert!(
            context(Role::Doctor)
                .require_any(&[Role::Patient, Role::Staff])
                .is_err()
        );
    }
}
