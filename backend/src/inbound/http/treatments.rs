//! Treatment API handlers.
//!
//! ```text
//! POST /api/v1/treatments {"patientId":"…","prescription":"…","daysToCure":5,"medicines":"…"}
//! GET  /api/v1/treatments
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Role, Treatment};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, required, require_user_with_role};

/// Prescription request body for `POST /api/v1/treatments`.
///
/// The prescribing doctor is the authenticated caller; only the patient
/// is referenced explicitly.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreatmentRequest {
    pub patient_id: Option<String>,
    pub prescription: Option<String>,
    pub days_to_cure: Option<u32>,
    pub medicines: Option<String>,
}

/// Wire representation of a treatment.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub prescription: String,
    pub days_to_cure: u32,
    pub medicines: String,
    pub created_at: DateTime<Utc>,
}

impl From<Treatment> for TreatmentResponse {
    fn from(treatment: Treatment) -> Self {
        Self {
            id: treatment.id,
            patient_id: treatment.patient_id,
            doctor_id: treatment.doctor_id,
            prescription: treatment.prescription,
            days_to_cure: treatment.days_to_cure,
            medicines: treatment.medicines,
            created_at: treatment.created_at,
        }
    }
}

/// Record a treatment as the authenticated doctor.
#[utoipa::path(
    post,
    path = "/api/v1/treatments",
    request_body = CreateTreatmentRequest,
    responses(
        (status = 201, description = "Treatment recorded", body = TreatmentResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Referenced patient not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["treatments"],
    operation_id = "createTreatment"
)]
#[post("/treatments")]
pub async fn create_treatment(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    payload: web::Json<CreateTreatmentRequest>,
) -> ApiResult<HttpResponse> {
    ctx.require_role(Role::Doctor)?;
    let payload = payload.into_inner();
    let patient_id = parse_uuid(
        required(payload.patient_id, FieldName::new("patientId"))?,
        FieldName::new("patientId"),
    )?;
    let prescription = required(payload.prescription, FieldName::new("prescription"))?;
    let days_to_cure = required(payload.days_to_cure, FieldName::new("daysToCure"))?;
    let medicines = required(payload.medicines, FieldName::new("medicines"))?;
    require_user_with_role(
        state.users.as_ref(),
        patient_id,
        Role::Patient,
        FieldName::new("patientId"),
    )
    .await?;

    let treatment = state
        .treatments
        .insert(Treatment::record(
            patient_id,
            ctx.user_id,
            prescription,
            days_to_cure,
            medicines,
        ))
        .await?;
    tracing::info!(treatment_id = %treatment.id, %patient_id, doctor_id = %ctx.user_id, "treatment recorded");
    Ok(HttpResponse::Created().json(TreatmentResponse::from(treatment)))
}

/// List treatments in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/treatments",
    responses(
        (status = 200, description = "Treatments", body = [TreatmentResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["treatments"],
    operation_id = "listTreatments"
)]
#[get("/treatments")]
pub async fn list_treatments(
    state: web::Data<HttpState>,
    _ctx: AuthContext,
) -> ApiResult<web::Json<Vec<TreatmentResponse>>> {
    let treatments = state.treatments.list().await?;
    Ok(web::Json(
        treatments.into_iter().map(TreatmentResponse::from).collect(),
    ))
}
