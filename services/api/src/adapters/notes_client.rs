//! services/api/src/adapters/notes_client.rs
//!
//! An HTTP implementation of the `NotesClient` port, used by the page-side
//! note form and recent notes viewer to talk to this service.

use crate::error::ErrorResponse;
use crate::web::rest::{CreateNoteRequest, CreateNoteResponse, NoteDto};
use async_trait::async_trait;
use birthday_card_core::domain::{Note, NoteDraft, SubmissionReceipt};
use birthday_card_core::ports::{NotesClient, PortError, PortResult};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

/// Talks to a running notes service at `base_url` (e.g. `http://host:4000`).
#[derive(Clone, Debug)]
pub struct HttpNotesClient {
    http: Client,
    base_url: String,
}

impl HttpNotesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }
}

/// Turns a non-success response into a `PortError`, keeping the server's
/// `error` message when it sent one.
async fn error_from(response: Response) -> PortError {
    let status = response.status();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    if status.is_server_error() {
        PortError::Unavailable(message)
    } else {
        PortError::Unexpected(message)
    }
}

fn transport_error(e: reqwest::Error) -> PortError {
    PortError::Unavailable(e.to_string())
}

#[async_trait]
impl NotesClient for HttpNotesClient {
    async fn submit_note(&self, draft: &NoteDraft) -> PortResult<SubmissionReceipt> {
        let body = CreateNoteRequest {
            name: draft.name.clone().map(Value::String),
            message: Some(draft.message.clone()),
        };
        let response = self
            .http
            .post(self.notes_url())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let created: CreateNoteResponse = response.json().await.map_err(transport_error)?;
        debug!("Note {} accepted by {}", created.note.id, self.base_url);
        Ok(SubmissionReceipt {
            note: created.note.into(),
            email_sent: created.email_sent,
            email_error: created.email_error,
        })
    }

    async fn list_notes(&self) -> PortResult<Vec<Note>> {
        let response = self
            .http
            .get(self.notes_url())
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let notes: Vec<NoteDto> = response.json().await.map_err(transport_error)?;
        Ok(notes.into_iter().map(Note::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let client = HttpNotesClient::new("http://localhost:4000/");
        assert_eq!(client.notes_url(), "http://localhost:4000/notes");
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        // Nothing listens on the discard port.
        let client = HttpNotesClient::new("http://127.0.0.1:9");
        let err = client.list_notes().await.unwrap_err();
        assert!(matches!(err, PortError::Unavailable(_)));
    }
}
