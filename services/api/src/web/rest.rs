//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ErrorResponse, RestError};
use crate::web::note_task::{list_notes, record_note};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use birthday_card_core::domain::{Note, NoteDraft, SubmissionReceipt, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_note_handler,
        list_notes_handler,
        health_handler,
    ),
    components(
        schemas(CreateNoteRequest, CreateNoteResponse, NoteDto, ErrorResponse, HealthResponse)
    ),
    tags(
        (name = "Birthday Notes API", description = "Leave a note for the birthday person.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The body of a note submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Any JSON value; scalars are turned into text, see [`coerce_name`].
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A note as it crosses the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: String,
    pub name: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub email_sent: Option<bool>,
    #[serde(default)]
    pub email_error: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            name: note.name,
            message: note.message,
            created_at: note.created_at,
            email_sent: note.email_sent,
            email_error: note.email_error,
            reply: note.reply,
        }
    }
}

impl From<NoteDto> for Note {
    fn from(dto: NoteDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            message: dto.message,
            created_at: dto.created_at,
            email_sent: dto.email_sent,
            email_error: dto.email_error,
            reply: dto.reply,
        }
    }
}

/// The response payload sent after a note was stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteResponse {
    pub ok: bool,
    pub note: NoteDto,
    pub email_sent: bool,
    pub email_error: Option<String>,
}

impl From<SubmissionReceipt> for CreateNoteResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            ok: true,
            note: receipt.note.into(),
            email_sent: receipt.email_sent,
            email_error: receipt.email_error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Text for a submitted `name`. Strings pass through, numbers and `true` are
/// written out, while falsy values (`""`, `0`, `false`, `null`) and
/// arrays/objects mean no name.
pub fn coerce_name(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Leave a note.
///
/// The note is stored first and then relayed by email. A relay failure does
/// not fail the request; it is reported in `emailSent`/`emailError`.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note stored", body = CreateNoteResponse),
        (status = 400, description = "Missing or empty message", body = ErrorResponse),
        (status = 500, description = "The note could not be stored", body = ErrorResponse)
    )
)]
pub async fn create_note_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RestError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected note payload: {}", rejection);
            return Err(ValidationError::EmptyMessage.into());
        }
    };
    let message = request.message.unwrap_or_default();
    let name = request.name.and_then(coerce_name);
    let draft = NoteDraft::new(name.as_deref(), &message)?;

    match record_note(&app_state, draft).await {
        Ok(receipt) => Ok((StatusCode::CREATED, Json(CreateNoteResponse::from(receipt)))),
        Err(e) => {
            error!("Error saving note: {:?}", e);
            Err(RestError::SaveFailed)
        }
    }
}

/// List every note, most recent first.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes", body = [NoteDto]),
        (status = 500, description = "The note store could not be read", body = ErrorResponse)
    )
)]
pub async fn list_notes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<NoteDto>>, RestError> {
    match list_notes(&app_state).await {
        Ok(notes) => Ok(Json(notes.into_iter().map(NoteDto::from).collect())),
        Err(e) => {
            error!("Error loading notes: {:?}", e);
            Err(RestError::LoadFailed)
        }
    }
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "server alive".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_names_become_text() {
        assert_eq!(coerce_name(json!("Sam")), Some("Sam".to_string()));
        assert_eq!(coerce_name(json!(5)), Some("5".to_string()));
        assert_eq!(coerce_name(json!(2.5)), Some("2.5".to_string()));
        assert_eq!(coerce_name(json!(true)), Some("true".to_string()));
    }

    #[test]
    fn falsy_or_structured_names_are_dropped() {
        for value in [json!(0), json!(false), json!(null), json!([1]), json!({ "a": 1 })] {
            assert_eq!(coerce_name(value), None);
        }
    }
}
