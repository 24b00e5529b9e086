//! Identity API handlers: registration, login, directory listings, and
//! the authenticated user's own record.
//!
//! ```text
//! POST /api/v1/register {"role":"patient","email":"a@x.com","name":"Alice","password":"pw"}
//! POST /api/v1/login {"email":"a@x.com","password":"pw"}
//! GET  /api/v1/patients | /doctors | /staff
//! GET  /api/v1/me (bearer)
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AppointmentStatus, EmailAddress, Error, LoginCredentials, LoginValidationError, PasswordHash,
    Profile, Role, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, required};

/// Registration request body for `POST /api/v1/register`.
///
/// Every field is optional at the serde layer so missing values produce
/// field-level validation errors rather than an opaque deserialisation
/// failure.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub role: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    /// Optional role-specific profile fields.
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// When present, must match the stored user's role.
    pub role: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user_id: Uuid,
}

/// Public view of a registered user. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            name: user.name,
            role: user.role,
            profile: user.profile,
            created_at: user.created_at,
        }
    }
}

fn parse_register_request(payload: RegisterRequest) -> Result<User, Error> {
    let role_raw = required(payload.role, FieldName::new("role"))?;
    let role: Role = role_raw.parse().map_err(|_| {
        invalid_value_error(
            FieldName::new("role"),
            &role_raw,
            "must be one of patient, doctor, or staff",
        )
    })?;
    let email_raw = required(payload.email, FieldName::new("email"))?;
    let email = EmailAddress::new(email_raw.clone())
        .map_err(|err| invalid_value_error(FieldName::new("email"), &email_raw, &err.to_string()))?;
    let name = required(payload.name, FieldName::new("name"))?;
    if name.trim().is_empty() {
        return Err(invalid_value_error(
            FieldName::new("name"),
            &name,
            "must not be empty",
        ));
    }
    let password = required(payload.password, FieldName::new("password"))?;
    if password.is_empty() {
        return Err(invalid_value_error(
            FieldName::new("password"),
            "",
            "must not be empty",
        ));
    }
    Ok(User::register(
        role,
        email,
        name,
        PasswordHash::derive(&password),
        payload.profile.unwrap_or_default(),
    ))
}

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request or duplicate email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let user = parse_register_request(payload.into_inner())?;
    let user = state.users.insert(user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate and issue a bearer token.
///
/// Every authentication failure answers with the same message so the
/// endpoint does not reveal which part of the credentials was wrong.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    let email = required(payload.email, FieldName::new("email"))?;
    let password = required(payload.password, FieldName::new("password"))?;
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(map_login_validation_error)?;
    let expected_role = payload
        .role
        .map(|raw| {
            raw.parse::<Role>().map_err(|_| {
                invalid_value_error(
                    FieldName::new("role"),
                    &raw,
                    "must be one of patient, doctor, or staff",
                )
            })
        })
        .transpose()?;

    let rejected = || Error::unauthorized("invalid credentials");
    let user = state
        .users
        .find_by_email(credentials.email())
        .await?
        .ok_or_else(rejected)?;
    if !user.password.verify(credentials.password()) {
        return Err(rejected());
    }
    if expected_role.is_some_and(|role| role != user.role) {
        return Err(rejected());
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
    Ok(web::Json(LoginResponse {
        token,
        role: user.role,
        user_id: user.id,
    }))
}

async fn list_role(state: &HttpState, role: Role) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_by_role(role).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// List registered patients in registration order.
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "Patients", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listPatients",
    security([])
)]
#[get("/patients")]
pub async fn list_patients(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    list_role(&state, Role::Patient).await
}

/// Optional specialization filter for `GET /api/v1/doctors`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListDoctorsQuery {
    /// Case-insensitive substring match on the doctor's specialization.
    pub specialization: Option<String>,
}

/// List registered doctors in registration order, optionally narrowed
/// by specialization.
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    params(ListDoctorsQuery),
    responses(
        (status = 200, description = "Doctors", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listDoctors",
    security([])
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    query: web::Query<ListDoctorsQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    // A blank filter behaves like no filter at all.
    let needle = query
        .into_inner()
        .specialization
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_lowercase());
    let doctors = state.users.list_by_role(Role::Doctor).await?;
    Ok(web::Json(
        doctors
            .into_iter()
            .filter(|u| {
                needle.as_ref().is_none_or(|needle| {
                    u.profile
                        .specialization
                        .as_ref()
                        .is_some_and(|s| s.to_lowercase().contains(needle))
                })
            })
            .map(UserResponse::from)
            .collect(),
    ))
}

/// List registered staff in registration order.
#[utoipa::path(
    get,
    path = "/api/v1/staff",
    responses(
        (status = 200, description = "Staff", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listStaff",
    security([])
)]
#[get("/staff")]
pub async fn list_staff(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    list_role(&state, Role::Staff).await
}

/// List the authenticated doctor's patients.
///
/// The roster is derived from approved appointments: each patient
/// appears once, in the order of their first approved appointment with
/// this doctor.
#[utoipa::path(
    get,
    path = "/api/v1/my-patients",
    responses(
        (status = 200, description = "The caller's patients", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "myPatients"
)]
#[get("/my-patients")]
pub async fn my_patients(
    state: web::Data<HttpState>,
    ctx: AuthContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    ctx.require_role(Role::Doctor)?;
    let appointments = state
        .appointments
        .list(Some(AppointmentStatus::Approved))
        .await?;
    let mut patient_ids = Vec::new();
    for appointment in appointments {
        if appointment.doctor_id == ctx.user_id && !patient_ids.contains(&appointment.patient_id) {
            patient_ids.push(appointment.patient_id);
        }
    }
    let mut patients = Vec::with_capacity(patient_ids.len());
    for id in patient_ids {
        let user = state
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::internal("appointment references a missing patient"))?;
        patients.push(UserResponse::from(user));
    }
    Ok(web::Json(patients))
}

/// Return the authenticated user's own record.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    ctx: AuthContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(ctx.user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
    Ok(web::Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        bearer, login_body, register_and_login, register_body, test_app, test_state,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn register_returns_created_user_without_password() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("patient", "alice@x.com", "Alice", "pw"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("user JSON");
        assert_eq!(value["email"], "alice@x.com");
        assert_eq!(value["role"], "patient");
        assert!(value.get("password").is_none());
        assert!(value.get("id").and_then(Value::as_str).is_some());
    }

    #[rstest]
    #[case(serde_json::json!({"email":"a@x.com","name":"A","password":"pw"}), "role")]
    #[case(serde_json::json!({"role":"patient","name":"A","password":"pw"}), "email")]
    #[case(serde_json::json!({"role":"patient","email":"a@x.com","password":"pw"}), "name")]
    #[case(serde_json::json!({"role":"patient","email":"a@x.com","name":"A"}), "password")]
    #[actix_web::test]
    async fn register_rejects_missing_fields(#[case] body: Value, #[case] field: &str) {
        let app = actix_test::init_service(test_app(test_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error JSON");
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
        assert_eq!(value["details"]["code"], "missing_field");
    }

    #[rstest]
    #[actix_web::test]
    async fn register_rejects_unknown_role() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("admin", "a@x.com", "A", "pw"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error JSON");
        assert_eq!(value["details"]["field"], "role");
        assert_eq!(value["details"]["value"], "admin");
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_a_conflict_on_http_400() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let first = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("patient", "alice@x.com", "Alice", "pw"))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, first).await.status(),
            StatusCode::CREATED
        );
        let second = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("doctor", "alice@x.com", "Other", "pw2"))
            .to_request();
        let response = actix_test::call_service(&app, second).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error JSON");
        assert_eq!(value["code"], "conflict");
    }

    #[rstest]
    #[actix_web::test]
    async fn login_returns_token_role_and_user_id() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let register_req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("doctor", "bob@x.com", "Bob", "secret"))
            .to_request();
        let created: Value = serde_json::from_slice(
            &actix_test::read_body(actix_test::call_service(&app, register_req).await).await,
        )
        .expect("user JSON");

        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(login_body("bob@x.com", "secret"))
            .to_request();
        let response = actix_test::call_service(&app, login_req).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("login JSON");
        assert_eq!(value["role"], "doctor");
        assert_eq!(value["userId"], created["id"]);
        assert!(!value["token"].as_str().expect("token string").is_empty());
    }

    #[rstest]
    #[case("bob@x.com", "wrong-password")]
    #[case("nobody@x.com", "secret")]
    #[actix_web::test]
    async fn login_failures_all_read_the_same(#[case] email: &str, #[case] password: &str) {
        let app = actix_test::init_service(test_app(test_state())).await;
        let register_req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("doctor", "bob@x.com", "Bob", "secret"))
            .to_request();
        actix_test::call_service(&app, register_req).await;

        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(login_body(email, password))
            .to_request();
        let response = actix_test::call_service(&app, login_req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error JSON");
        assert_eq!(value["message"], "invalid credentials");
    }

    #[rstest]
    #[actix_web::test]
    async fn login_with_mismatched_role_is_rejected() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let register_req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("patient", "alice@x.com", "Alice", "pw"))
            .to_request();
        actix_test::call_service(&app, register_req).await;

        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({
                "email": "alice@x.com",
                "password": "pw",
                "role": "doctor",
            }))
            .to_request();
        let response = actix_test::call_service(&app, login_req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn role_listings_are_public_and_ordered() {
        let app = actix_test::init_service(test_app(test_state())).await;
        for (email, name) in [("d1@x.com", "First"), ("d2@x.com", "Second")] {
            let request = actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("doctor", email, name, "pw"))
                .to_request();
            actix_test::call_service(&app, request).await;
        }
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/doctors")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("list JSON");
        let names: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .map(|u| u["name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[rstest]
    #[case("cardio", &["Heart One", "Heart Two"])]
    #[case("CARDIOLOGY", &["Heart One", "Heart Two"])]
    #[case("derma", &["Skin"])]
    #[case("", &["Heart One", "Heart Two", "Skin"])]
    #[actix_web::test]
    async fn doctors_filter_by_specialization_substring(
        #[case] filter: &str,
        #[case] expected: &[&str],
    ) {
        let app = actix_test::init_service(test_app(test_state())).await;
        for (email, name, specialization) in [
            ("h1@x.com", "Heart One", "Cardiology"),
            ("h2@x.com", "Heart Two", "cardiology"),
            ("s1@x.com", "Skin", "Dermatology"),
        ] {
            let request = actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(serde_json::json!({
                    "role": "doctor",
                    "email": email,
                    "name": name,
                    "password": "pw",
                    "profile": { "specialization": specialization },
                }))
                .to_request();
            assert!(
                actix_test::call_service(&app, request)
                    .await
                    .status()
                    .is_success()
            );
        }
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/doctors?specialization={filter}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("list JSON");
        let names: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .map(|u| u["name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn roster_lists_each_approved_patient_once() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let (alice, alice_token) = register_and_login(&app, "patient", "alice@x.com", "Alice").await;
        let (carol, carol_token) = register_and_login(&app, "patient", "carol@x.com", "Carol").await;
        let (bob, bob_token) = register_and_login(&app, "doctor", "bob@x.com", "Bob").await;

        // Alice books twice, Carol once; Bob approves all but Carol's.
        for (patient, token) in [(&alice, &alice_token), (&alice, &alice_token)] {
            let booked = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/appointments")
                    .insert_header(bearer(token))
                    .set_json(serde_json::json!({
                        "patientId": patient,
                        "doctorId": bob,
                        "scheduledTime": "2026-09-01T10:30:00Z",
                    }))
                    .to_request(),
            )
            .await;
            let booked: Value =
                serde_json::from_slice(&actix_test::read_body(booked).await).expect("JSON");
            let id = booked["id"].as_str().expect("id");
            let approved = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri(&format!("/api/v1/appointments/{id}/approve"))
                    .insert_header(bearer(&bob_token))
                    .to_request(),
            )
            .await;
            assert_eq!(approved.status(), StatusCode::OK);
        }
        let pending = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/appointments")
                .insert_header(bearer(&carol_token))
                .set_json(serde_json::json!({
                    "patientId": carol,
                    "doctorId": bob,
                    "scheduledTime": "2026-09-02T10:30:00Z",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(pending.status(), StatusCode::CREATED);

        let roster = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/my-patients")
                .insert_header(bearer(&bob_token))
                .to_request(),
        )
        .await;
        assert_eq!(roster.status(), StatusCode::OK);
        let roster: Value =
            serde_json::from_slice(&actix_test::read_body(roster).await).expect("JSON");
        let ids: Vec<&str> = roster
            .as_array()
            .expect("array")
            .iter()
            .map(|u| u["id"].as_str().expect("id"))
            .collect();
        assert_eq!(ids, [alice.as_str()]);
    }

    #[rstest]
    #[actix_web::test]
    async fn roster_is_doctor_only() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let (_, alice_token) = register_and_login(&app, "patient", "alice@x.com", "Alice").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/my-patients")
                .insert_header(bearer(&alice_token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn me_requires_a_bearer_token() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/me").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn me_returns_the_token_owner() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let register_req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("staff", "sam@x.com", "Sam", "pw"))
            .to_request();
        actix_test::call_service(&app, register_req).await;
        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(login_body("sam@x.com", "pw"))
            .to_request();
        let login_value: Value = serde_json::from_slice(
            &actix_test::read_body(actix_test::call_service(&app, login_req).await).await,
        )
        .expect("login JSON");
        let token = login_value["token"].as_str().expect("token");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/me")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("user JSON");
        assert_eq!(value["email"], "sam@x.com");
        assert_eq!(value["role"], "staff");
    }
}
