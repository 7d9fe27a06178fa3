//! crates/birthday_card_core/src/recent_notes.rs
//!
//! Read-only projection of the note list for the "Recent notes" card and the
//! admin page.

use crate::domain::{sort_newest_first, Note};
use crate::ports::{NotesClient, PortResult};
use chrono::{DateTime, Utc};

pub const NO_NOTES_YET: &str = "No notes yet - be the first to send one!";
/// How many notes the card on the main page shows.
pub const CARD_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: String,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub reply: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentNotes {
    entries: Vec<NoteSummary>,
}

impl RecentNotes {
    /// Newest first, at most `limit` entries.
    pub fn from_notes(mut notes: Vec<Note>, limit: usize) -> Self {
        sort_newest_first(&mut notes);
        let entries = notes
            .into_iter()
            .take(limit)
            .map(|n| NoteSummary {
                author: n.author().to_string(),
                id: n.id,
                message: n.message,
                created_at: n.created_at,
                reply: n.reply,
            })
            .collect();
        Self { entries }
    }

    /// Loads the list through `client`; a failed load shows as empty.
    pub async fn load(client: &dyn NotesClient, limit: usize) -> Self {
        match client.list_notes().await {
            Ok(notes) => Self::from_notes(notes, limit),
            Err(e) => {
                tracing::warn!("Failed to load notes: {}", e);
                Self::default()
            }
        }
    }

    /// Like [`RecentNotes::load`], but surfaces the error (admin page).
    pub async fn try_load(client: &dyn NotesClient, limit: usize) -> PortResult<Self> {
        Ok(Self::from_notes(client.list_notes().await?, limit))
    }

    pub fn entries(&self) -> &[NoteSummary] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The placeholder shown when there is nothing to list.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_NOTES_YET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note(id: &str, name: Option<&str>, minute: u32) -> Note {
        Note {
            id: id.into(),
            name: name.map(Into::into),
            message: format!("message {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            email_sent: Some(false),
            email_error: None,
            reply: None,
        }
    }

    #[test]
    fn newest_first_and_limited() {
        let notes = (0..8).map(|i| note(&i.to_string(), Some("Sam"), i)).collect();
        let recent = RecentNotes::from_notes(notes, CARD_LIMIT);
        let ids: Vec<_> = recent.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn anonymous_notes_show_anon() {
        let recent = RecentNotes::from_notes(vec![note("a", None, 1)], CARD_LIMIT);
        assert_eq!(recent.entries()[0].author, "Anon");
        assert_eq!(recent.empty_message(), None);
    }

    #[test]
    fn empty_list_has_a_placeholder() {
        let recent = RecentNotes::from_notes(Vec::new(), CARD_LIMIT);
        assert_eq!(recent.empty_message(), Some(NO_NOTES_YET));
    }
}
