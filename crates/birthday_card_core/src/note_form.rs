//! crates/birthday_card_core/src/note_form.rs
//!
//! Client-side state of the "leave a little note" form.

use crate::domain::{NoteDraft, SubmissionReceipt, MAX_MESSAGE_CHARS, MAX_NAME_CHARS};
use crate::ports::{NotesClient, PortResult};
use tracing::warn;

pub const EMPTY_MESSAGE: &str = "Please write a message.";
pub const SAVED_AND_EMAILED: &str = "Note saved & emailed - thank you!";
pub const SAVED_EMAIL_FAILED: &str = "Note accepted but email sending failed (check server).";
pub const SUBMIT_FAILED: &str = "Network or server error - try again.";

/// The inline message under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub ok: bool,
    pub message: &'static str,
}

impl FormStatus {
    fn ok(message: &'static str) -> Self {
        Self { ok: true, message }
    }

    fn err(message: &'static str) -> Self {
        Self { ok: false, message }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteForm {
    name: String,
    message: String,
    status: Option<FormStatus>,
    submitting: bool,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input is capped the way the text fields cap it.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(MAX_NAME_CHARS).collect();
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.chars().take(MAX_MESSAGE_CHARS).collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    /// While true, the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// `"<used>/2000"`.
    pub fn counter(&self) -> String {
        format!("{}/{}", self.message.chars().count(), MAX_MESSAGE_CHARS)
    }

    pub fn button_label(&self) -> &'static str {
        if self.submitting {
            "Sending…"
        } else {
            "Send note"
        }
    }

    /// Validates and locks the form. `None` means nothing should be sent:
    /// either the message is empty (status explains) or a send is in flight.
    pub fn begin_submit(&mut self) -> Option<NoteDraft> {
        if self.submitting {
            return None;
        }
        self.status = None;
        let name = Some(self.name.as_str());
        match NoteDraft::new(name, &self.message) {
            Ok(draft) => {
                self.submitting = true;
                Some(draft)
            }
            Err(_) => {
                self.status = Some(FormStatus::err(EMPTY_MESSAGE));
                None
            }
        }
    }

    /// Reconciles the server's answer and always unlocks the form.
    pub fn finish_submit(&mut self, result: PortResult<SubmissionReceipt>) {
        self.submitting = false;
        match result {
            Ok(receipt) => {
                self.status = Some(if receipt.email_sent {
                    FormStatus::ok(SAVED_AND_EMAILED)
                } else {
                    FormStatus::ok(SAVED_EMAIL_FAILED)
                });
                self.name.clear();
                self.message.clear();
            }
            Err(e) => {
                warn!("Note submission failed: {}", e);
                self.status = Some(FormStatus::err(SUBMIT_FAILED));
            }
        }
    }

    /// The whole round trip against `client`.
    pub async fn submit(&mut self, client: &dyn NotesClient) {
        let Some(draft) = self.begin_submit() else {
            return;
        };
        let result = client.submit_note(&draft).await;
        self.finish_submit(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Note, NoteDraft};
    use crate::ports::PortError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    enum Reply {
        Emailed,
        EmailFailed,
        Down,
    }

    struct FakeClient {
        reply: Reply,
        sent: Mutex<Vec<NoteDraft>>,
    }

    impl FakeClient {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NotesClient for FakeClient {
        async fn submit_note(&self, draft: &NoteDraft) -> PortResult<SubmissionReceipt> {
            self.sent.lock().unwrap().push(draft.clone());
            let note = Note {
                id: "1-abcdefg".into(),
                name: draft.name.clone(),
                message: draft.message.clone(),
                created_at: Utc::now(),
                email_sent: None,
                email_error: None,
                reply: None,
            };
            match self.reply {
                Reply::Emailed => Ok(SubmissionReceipt {
                    note,
                    email_sent: true,
                    email_error: None,
                }),
                Reply::EmailFailed => Ok(SubmissionReceipt {
                    note,
                    email_sent: false,
                    email_error: Some("Missing EMAIL_TO environment variable.".into()),
                }),
                Reply::Down => Err(PortError::Unavailable("connection refused".into())),
            }
        }

        async fn list_notes(&self) -> PortResult<Vec<Note>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn blank_message_never_reaches_the_network() {
        let client = FakeClient::new(Reply::Emailed);
        let mut form = NoteForm::new();
        form.set_message("   \n ");
        form.submit(&client).await;

        assert_eq!(client.calls(), 0);
        assert_eq!(form.status(), Some(&FormStatus::err(EMPTY_MESSAGE)));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn emailed_note_clears_the_form() {
        let client = FakeClient::new(Reply::Emailed);
        let mut form = NoteForm::new();
        form.set_name("  Sam ");
        form.set_message(" hello ");
        form.submit(&client).await;

        let sent = client.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![NoteDraft::new(Some("Sam"), "hello").unwrap()]);
        assert_eq!(form.status(), Some(&FormStatus::ok(SAVED_AND_EMAILED)));
        assert_eq!(form.message(), "");
        assert_eq!(form.name(), "");
    }

    #[tokio::test]
    async fn relay_failure_is_a_soft_success() {
        let client = FakeClient::new(Reply::EmailFailed);
        let mut form = NoteForm::new();
        form.set_message("hi");
        form.submit(&client).await;
        assert_eq!(form.status(), Some(&FormStatus::ok(SAVED_EMAIL_FAILED)));
    }

    #[tokio::test]
    async fn network_failure_keeps_text_and_unlocks() {
        let client = FakeClient::new(Reply::Down);
        let mut form = NoteForm::new();
        form.set_message("hi");
        form.submit(&client).await;
        assert_eq!(form.status(), Some(&FormStatus::err(SUBMIT_FAILED)));
        assert_eq!(form.message(), "hi");
        assert!(!form.is_submitting());
        assert_eq!(form.button_label(), "Send note");
    }

    #[test]
    fn in_flight_submit_blocks_a_second_one() {
        let mut form = NoteForm::new();
        form.set_message("hi");
        assert!(form.begin_submit().is_some());
        assert!(form.is_submitting());
        assert_eq!(form.button_label(), "Sending…");
        assert!(form.begin_submit().is_none());
        form.finish_submit(Err(PortError::Unexpected("boom".into())));
        assert!(!form.is_submitting());
    }

    #[test]
    fn inputs_are_capped_and_counted() {
        let mut form = NoteForm::new();
        form.set_message(&"x".repeat(2100));
        form.set_name(&"y".repeat(70));
        assert_eq!(form.counter(), "2000/2000");
        assert_eq!(form.name().chars().count(), 64);
    }
}
