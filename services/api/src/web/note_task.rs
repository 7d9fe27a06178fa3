//! services/api/src/web/note_task.rs
//!
//! Records a note and relays it. The relay never decides whether the note was
//! accepted; its outcome is attached to the note as metadata.

use crate::web::state::AppState;
use birthday_card_core::domain::{sort_newest_first, Note, NoteDraft, SubmissionReceipt};
use birthday_card_core::ports::PortResult;
use chrono::Utc;
use tracing::{info, warn};

/// Persists `draft`, then tries the notification relay.
///
/// Fails only when the note could not be stored.
pub async fn record_note(app_state: &AppState, draft: NoteDraft) -> PortResult<SubmissionReceipt> {
    let mut note = {
        let mut rng = rand::thread_rng();
        Note::from_draft(draft, Utc::now(), &mut rng)
    };

    app_state.notes.append_note(&note).await?;
    info!("Stored note {}", note.id);

    let (email_sent, email_error) = match app_state.notifier.notify_new_note(&note).await {
        Ok(()) => (true, None),
        Err(e) => {
            warn!("Note {} stored but not relayed: {}", note.id, e);
            (false, Some(e.to_string()))
        }
    };
    note.email_sent = Some(email_sent);
    note.email_error = email_error.clone();

    if let Err(e) = app_state.notes.update_note(&note).await {
        warn!("Could not record relay status for note {}: {}", note.id, e);
    }

    Ok(SubmissionReceipt {
        note,
        email_sent,
        email_error,
    })
}

/// Every note, most recent first.
pub async fn list_notes(app_state: &AppState) -> PortResult<Vec<Note>> {
    let mut notes = app_state.notes.list_notes().await?;
    sort_newest_first(&mut notes);
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mailer::UnconfiguredNotifier;
    use crate::config::{Config, MailConfig};
    use async_trait::async_trait;
    use birthday_card_core::ports::{NoteRepository, NotificationService, PortError};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryNotes {
        notes: Mutex<Vec<Note>>,
        fail_append: bool,
        fail_update: bool,
    }

    #[async_trait]
    impl NoteRepository for MemoryNotes {
        async fn list_notes(&self) -> PortResult<Vec<Note>> {
            Ok(self.notes.lock().unwrap().clone())
        }

        async fn append_note(&self, note: &Note) -> PortResult<()> {
            if self.fail_append {
                return Err(PortError::Unexpected("read-only".into()));
            }
            self.notes.lock().unwrap().push(note.clone());
            Ok(())
        }

        async fn update_note(&self, note: &Note) -> PortResult<()> {
            if self.fail_update {
                return Err(PortError::Unexpected("read-only".into()));
            }
            let mut notes = self.notes.lock().unwrap();
            if let Some(slot) = notes.iter_mut().find(|n| n.id == note.id) {
                *slot = note.clone();
            }
            Ok(())
        }
    }

    struct AlwaysSends;

    #[async_trait]
    impl NotificationService for AlwaysSends {
        async fn notify_new_note(&self, _note: &Note) -> PortResult<()> {
            Ok(())
        }
    }

    fn state(notes: Arc<MemoryNotes>, notifier: Arc<dyn NotificationService>) -> AppState {
        AppState {
            notes,
            notifier,
            config: Arc::new(Config {
                bind_address: "127.0.0.1:0".parse().unwrap(),
                log_level: tracing::Level::INFO,
                notes_file: "unused.json".into(),
                cors_origin: None,
                mail: MailConfig::default(),
            }),
        }
    }

    fn draft() -> NoteDraft {
        NoteDraft::new(Some("Sam"), "hello").unwrap()
    }

    #[tokio::test]
    async fn relayed_note_is_marked_sent() {
        let notes = Arc::new(MemoryNotes::default());
        let receipt = record_note(&state(notes.clone(), Arc::new(AlwaysSends)), draft())
            .await
            .unwrap();
        assert!(receipt.email_sent);
        assert_eq!(receipt.email_error, None);
        assert_eq!(notes.notes.lock().unwrap()[0].email_sent, Some(true));
    }

    #[tokio::test]
    async fn relay_failure_still_accepts_the_note() {
        let notes = Arc::new(MemoryNotes::default());
        let notifier = Arc::new(UnconfiguredNotifier::new("Missing EMAIL_TO environment variable."));
        let receipt = record_note(&state(notes.clone(), notifier), draft()).await.unwrap();
        assert!(!receipt.email_sent);
        assert!(receipt.email_error.unwrap().contains("EMAIL_TO"));
        let stored = notes.notes.lock().unwrap()[0].clone();
        assert_eq!(stored.email_sent, Some(false));
    }

    #[tokio::test]
    async fn storage_failure_is_the_only_hard_failure() {
        let notes = Arc::new(MemoryNotes {
            fail_append: true,
            ..Default::default()
        });
        assert!(record_note(&state(notes, Arc::new(AlwaysSends)), draft()).await.is_err());

        let notes = Arc::new(MemoryNotes {
            fail_update: true,
            ..Default::default()
        });
        let receipt = record_note(&state(notes, Arc::new(AlwaysSends)), draft()).await.unwrap();
        assert!(receipt.email_sent);
    }
}
