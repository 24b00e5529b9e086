//! Helpers shared by handler tests.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::{Value, json};

use crate::inbound::http::state::HttpState;
use crate::server::api_scope;

/// Fresh in-memory state with a fixed test secret.
pub fn test_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::in_memory("test-secret"))
}

/// App exposing the full `/api/v1` surface over `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(api_scope())
}

/// Registration body for a user with no profile fields.
pub fn register_body(role: &str, email: &str, name: &str, password: &str) -> Value {
    json!({
        "role": role,
        "email": email,
        "name": name,
        "password": password,
    })
}

/// Login body matching [`register_body`] credentials.
pub fn login_body(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

/// Register a user and log them in, returning `(user id, bearer token)`.
pub async fn register_and_login<S>(app: &S, role: &str, email: &str, name: &str) -> (String, String)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    use actix_web::test as actix_test;

    let register = actix_test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(register_body(role, email, name, "pw"))
        .to_request();
    let response = actix_test::call_service(app, register).await;
    assert!(response.status().is_success(), "registration failed");
    let user: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("user JSON");
    let user_id = user["id"].as_str().expect("user id").to_owned();

    let login = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(login_body(email, "pw"))
        .to_request();
    let response = actix_test::call_service(app, login).await;
    assert!(response.status().is_success(), "login failed");
    let body: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("login JSON");
    let token = body["token"].as_str().expect("token").to_owned();

    (user_id, token)
}

/// `Authorization` header tuple for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
