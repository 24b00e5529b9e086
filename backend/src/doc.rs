//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API:
//! every `/api/v1` endpoint, the health probes, the error envelope, and
//! the bearer token security scheme. Swagger UI serves the document in
//! debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Profile, Role};
use crate::inbound::http::appointments::{
    AppointmentResponse, CreateAppointmentRequest, LetterResponse,
};
use crate::inbound::http::bills::{BillResponse, CreateBillRequest};
use crate::inbound::http::messages::{MessageResponse, SendMessageRequest};
use crate::inbound::http::treatments::{CreateTreatmentRequest, TreatmentResponse};
use crate::inbound::http::users::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Wardline backend API",
        description = "HTTP interface for hospital records: accounts, \
                       appointments, treatments, billing, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_patients,
        crate::inbound::http::users::list_doctors,
        crate::inbound::http::users::list_staff,
        crate::inbound::http::users::my_patients,
        crate::inbound::http::users::me,
        crate::inbound::http::appointments::create_appointment,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::appointments::approve_appointment,
        crate::inbound::http::appointments::remove_appointment,
        crate::inbound::http::appointments::clear_notification,
        crate::inbound::http::appointments::appointment_letter,
        crate::inbound::http::appointments::appointment_document,
        crate::inbound::http::treatments::create_treatment,
        crate::inbound::http::treatments::list_treatments,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::bills::create_bill,
        crate::inbound::http::bills::list_bills,
        crate::inbound::http::bills::pay_bill,
        crate::inbound::http::bills::bill_document,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        Profile,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        UserResponse,
        CreateAppointmentRequest,
        AppointmentResponse,
        LetterResponse,
        CreateTreatmentRequest,
        TreatmentResponse,
        SendMessageRequest,
        MessageResponse,
        CreateBillRequest,
        BillResponse,
    )),
    tags(
        (name = "users", description = "Accounts, login, and public directories"),
        (name = "appointments", description = "Booking and the appointment lifecycle"),
        (name = "treatments", description = "Prescriptions recorded by doctors"),
        (name = "messages", description = "Patient-to-doctor messaging"),
        (name = "bills", description = "Invoicing and payment"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
