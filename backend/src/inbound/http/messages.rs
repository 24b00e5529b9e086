//! Patient-to-doctor messaging handlers.
//!
//! ```text
//! POST /api/v1/messages {"doctorId":"…","content":"…"}
//! GET  /api/v1/messages (doctor's own inbox)
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Message, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_uuid, require_user_with_role, required,
};

/// Message request body for `POST /api/v1/messages`.
///
/// The sender is the authenticated patient; only the addressed doctor
/// is referenced explicitly.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub doctor_id: Option<String>,
    pub content: Option<String>,
}

/// Wire representation of a message.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            patient_id: message.patient_id,
            doctor_id: message.doctor_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Send a message to a doctor as the authenticated patient.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Addressed doctor not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    ctx.require_role(Role::Patient)?;
    let payload = payload.into_inner();
    let doctor_id = parse_uuid(
        required(payload.doctor_id, FieldName::new("doctorId"))?,
        FieldName::new("doctorId"),
    )?;
    let content = required(payload.content, FieldName::new("content"))?;
    if content.trim().is_empty() {
        return Err(invalid_value_error(
            FieldName::new("content"),
            &content,
            "must not be empty",
        ));
    }
    require_user_with_role(
        state.users.as_ref(),
        doctor_id,
        Role::Doctor,
        FieldName::new("doctorId"),
    )
    .await?;

    let message = state
        .messages
        .insert(Message::send(ctx.user_id, doctor_id, content))
        .await?;
    tracing::info!(message_id = %message.id, patient_id = %ctx.user_id, %doctor_id, "message sent");
    Ok(HttpResponse::Created().json(MessageResponse::from(message)))
}

/// List the authenticated doctor's inbox in send order.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses(
        (status = 200, description = "Messages addressed to the caller", body = [MessageResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    ctx: AuthContext,
) -> ApiResult<web::Json<Vec<MessageResponse>>> {
    ctx.require_role(Role::Doctor)?;
    let messages = state.messages.list_for_doctor(ctx.user_id).await?;
    Ok(web::Json(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}
