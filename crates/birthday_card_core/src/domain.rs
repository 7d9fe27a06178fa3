//! crates/birthday_card_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any rendering surface or serialization format.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Longest accepted author name, in characters.
pub const MAX_NAME_CHARS: usize = 64;
/// Longest accepted note body, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// One picture in the memory slideshow. Order in the owning list is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub source: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

impl Slide {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alt: None,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Accessible label: alt text, then caption, then `slide-{n}` (1-based).
    pub fn label(&self, position: usize) -> String {
        self.alt
            .clone()
            .or_else(|| self.caption.clone())
            .unwrap_or_else(|| format!("slide-{}", position + 1))
    }
}

/// Lifecycle of the greeting card. `Open` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOpenState {
    Closed,
    Opening,
    Open,
}

/// Rejections raised before any side effect of a note submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Message is required.")]
    EmptyMessage,
}

/// A validated, trimmed and length-capped note submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub name: Option<String>,
    pub message: String,
}

impl NoteDraft {
    pub fn new(name: Option<&str>, message: &str) -> Result<Self, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| truncate_chars(n, MAX_NAME_CHARS));
        Ok(Self {
            name,
            message: truncate_chars(message, MAX_MESSAGE_CHARS),
        })
    }
}

/// A persisted note left by a visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub name: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub email_sent: Option<bool>,
    pub email_error: Option<String>,
    pub reply: Option<String>,
}

impl Note {
    /// Stamps a draft with a creation time and a fresh id.
    pub fn from_draft<R: Rng + ?Sized>(draft: NoteDraft, created_at: DateTime<Utc>, rng: &mut R) -> Self {
        Self {
            id: generate_note_id(created_at, rng),
            name: draft.name,
            message: draft.message,
            created_at,
            email_sent: None,
            email_error: None,
            reply: None,
        }
    }

    /// Display name, or "Anon" for anonymous notes.
    pub fn author(&self) -> &str {
        self.name.as_deref().unwrap_or("Anon")
    }
}

/// What the server reports back for an accepted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub note: Note,
    pub email_sent: bool,
    pub email_error: Option<String>,
}

/// `<unix-millis>-<7 base36 chars>`.
pub fn generate_note_id<R: Rng + ?Sized>(created_at: DateTime<Utc>, rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..7)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", created_at.timestamp_millis(), suffix)
}

/// Sorts notes most recent first.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
