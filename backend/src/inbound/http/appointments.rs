//! Appointment API handlers.
//!
//! ```text
//! POST /api/v1/appointments {"patientId":"…","doctorId":"…","scheduledTime":"2026-09-01T10:30:00Z"}
//! GET  /api/v1/appointments[?status=pending]
//! POST /api/v1/appointments/{id}/approve | /remove | /clear-notification
//! GET  /api/v1/appointments/{id}/letter | /document
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Appointment, AppointmentStatus, Error, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_rfc3339_timestamp, parse_uuid, required,
    require_user_with_role,
};
use crate::render;

/// Booking request body for `POST /api/v1/appointments`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    /// RFC 3339 timestamp of the requested consultation.
    pub scheduled_time: Option<String>,
}

/// Wire representation of an appointment.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            scheduled_time: appointment.scheduled_time,
            status: appointment.status,
            notified: appointment.notified,
            created_at: appointment.created_at,
        }
    }
}

/// Optional status filter for `GET /api/v1/appointments`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListAppointmentsQuery {
    /// One of `pending`, `approved`, or `removed`.
    pub status: Option<String>,
}

/// Plain-text confirmation letter payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LetterResponse {
    pub letter: String,
}

async fn fetch_appointment(state: &HttpState, id: Uuid) -> Result<Appointment, Error> {
    state
        .appointments
        .get(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("no appointment with id {id}")))
}

/// Resolve the patient and doctor an appointment references.
///
/// Both existed when the appointment was created, so a miss here means
/// the ledgers disagree and is an internal failure, not a client error.
async fn fetch_participants(
    state: &HttpState,
    appointment: &Appointment,
) -> Result<(User, User), Error> {
    let patient = state
        .users
        .find_by_id(appointment.patient_id)
        .await?
        .ok_or_else(|| Error::internal("appointment references a missing patient"))?;
    let doctor = state
        .users
        .find_by_id(appointment.doctor_id)
        .await?
        .ok_or_else(|| Error::internal("appointment references a missing doctor"))?;
    Ok((patient, doctor))
}

fn pdf_response(filename: String, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes)
}

/// Book a new appointment.
///
/// Patients may only book for themselves; staff can book on any
/// patient's behalf.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Referenced user not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "createAppointment"
)]
#[post("/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    payload: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    ctx.require_any(&[Role::Patient, Role::Staff])?;
    let payload = payload.into_inner();
    let patient_id = parse_uuid(
        required(payload.patient_id, FieldName::new("patientId"))?,
        FieldName::new("patientId"),
    )?;
    let doctor_id = parse_uuid(
        required(payload.doctor_id, FieldName::new("doctorId"))?,
        FieldName::new("doctorId"),
    )?;
    let scheduled_time = parse_rfc3339_timestamp(
        required(payload.scheduled_time, FieldName::new("scheduledTime"))?,
        FieldName::new("scheduledTime"),
    )?;
    if ctx.role == Role::Patient && patient_id != ctx.user_id {
        return Err(Error::forbidden(
            "patients can only book appointments for themselves",
        ));
    }
    require_user_with_role(
        state.users.as_ref(),
        patient_id,
        Role::Patient,
        FieldName::new("patientId"),
    )
    .await?;
    require_user_with_role(
        state.users.as_ref(),
        doctor_id,
        Role::Doctor,
        FieldName::new("doctorId"),
    )
    .await?;

    let appointment = state
        .appointments
        .insert(Appointment::book(patient_id, doctor_id, scheduled_time))
        .await?;
    tracing::info!(appointment_id = %appointment.id, %patient_id, %doctor_id, "appointment booked");
    Ok(HttpResponse::Created().json(AppointmentResponse::from(appointment)))
}

/// List appointments in creation order, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(ListAppointmentsQuery),
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 400, description = "Invalid status filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    _ctx: AuthContext,
    query: web::Query<ListAppointmentsQuery>,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    let status = query
        .into_inner()
        .status
        .map(|raw| {
            raw.parse::<AppointmentStatus>().map_err(|_| {
                invalid_value_error(
                    FieldName::new("status"),
                    &raw,
                    "must be one of pending, approved, or removed",
                )
            })
        })
        .transpose()?;
    let appointments = state.appointments.list(status).await?;
    Ok(web::Json(
        appointments
            .into_iter()
            .map(AppointmentResponse::from)
            .collect(),
    ))
}

/// Approve a pending appointment as its doctor.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/approve",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment approved", body = AppointmentResponse),
        (status = 400, description = "Not in the pending state", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not this appointment's doctor", body = Error),
        (status = 404, description = "Unknown appointment", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "approveAppointment"
)]
#[post("/appointments/{id}/approve")]
pub async fn approve_appointment(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    ctx.require_role(Role::Doctor)?;
    let appointment = state
        .appointments
        .approve(id.into_inner(), ctx.user_id)
        .await?;
    tracing::info!(appointment_id = %appointment.id, doctor_id = %ctx.user_id, "appointment approved");
    Ok(web::Json(AppointmentResponse::from(appointment)))
}

/// Soft-delete an appointment.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/remove",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment removed", body = AppointmentResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown appointment", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "removeAppointment"
)]
#[post("/appointments/{id}/remove")]
pub async fn remove_appointment(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    ctx.require_role(Role::Staff)?;
    let appointment = state.appointments.remove(id.into_inner()).await?;
    tracing::info!(appointment_id = %appointment.id, "appointment removed");
    Ok(web::Json(AppointmentResponse::from(appointment)))
}

/// Clear the needs-attention indicator on an appointment.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/clear-notification",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Notification cleared", body = AppointmentResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown appointment", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "clearAppointmentNotification"
)]
#[post("/appointments/{id}/clear-notification")]
pub async fn clear_notification(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    ctx.require_role(Role::Staff)?;
    let appointment = state.appointments.clear_notification(id.into_inner()).await?;
    Ok(web::Json(AppointmentResponse::from(appointment)))
}

/// Compose the plain-text confirmation letter for an appointment.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}/letter",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Confirmation letter", body = LetterResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown appointment", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "appointmentLetter"
)]
#[get("/appointments/{id}/letter")]
pub async fn appointment_letter(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<LetterResponse>> {
    ctx.require_role(Role::Staff)?;
    let appointment = fetch_appointment(&state, id.into_inner()).await?;
    let (patient, doctor) = fetch_participants(&state, &appointment).await?;
    let letter = render::appointment_letter_text(&appointment, &patient, &doctor);
    Ok(web::Json(LetterResponse { letter }))
}

/// Render the confirmation letter for an appointment as a PDF.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}/document",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "PDF letter", content_type = "application/pdf"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown appointment", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "appointmentDocument"
)]
#[get("/appointments/{id}/document")]
pub async fn appointment_document(
    state: web::Data<HttpState>,
    _ctx: AuthContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let appointment = fetch_appointment(&state, id.into_inner()).await?;
    let (patient, doctor) = fetch_participants(&state, &appointment).await?;
    let bytes = render::appointment_letter_pdf(&appointment, &patient, &doctor)?;
    Ok(pdf_response(
        format!("appointment-{}.pdf", appointment.id),
        bytes,
    ))
}
