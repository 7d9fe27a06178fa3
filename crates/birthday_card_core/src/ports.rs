//! crates/birthday_card_core/src/ports.rs
//!
//! Defines the service contracts (traits) at the edges of the core.
//!
//! Server-side ports (`NoteRepository`, `NotificationService`, `NotesClient`)
//! are async and thread-safe. Host capability ports (`MotionPreference`,
//! `AudioTrack`, `FocusTarget`) are used from the single-threaded UI model
//! and are injected so tests can substitute them.

use crate::domain::{Note, NoteDraft, SubmissionReceipt};
use async_trait::async_trait;
use std::time::Duration;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Server Ports
//=========================================================================================

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Every stored note, in storage order.
    async fn list_notes(&self) -> PortResult<Vec<Note>>;

    async fn append_note(&self, note: &Note) -> PortResult<()>;

    /// Replaces the stored note with the same id.
    async fn update_note(&self, note: &Note) -> PortResult<()>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Relays a freshly stored note to the site owner.
    async fn notify_new_note(&self, note: &Note) -> PortResult<()>;
}

/// The browser side of the notes API.
#[async_trait]
pub trait NotesClient: Send + Sync {
    async fn submit_note(&self, draft: &NoteDraft) -> PortResult<SubmissionReceipt>;

    async fn list_notes(&self) -> PortResult<Vec<Note>>;
}

//=========================================================================================
// Host Capability Ports
//=========================================================================================

/// The environment's reduced-motion accessibility signal.
pub trait MotionPreference {
    fn prefers_reduced_motion(&self) -> bool;
}

/// A fixed answer, for hosts without a live media query and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReducedMotion(pub bool);

impl MotionPreference for ReducedMotion {
    fn prefers_reduced_motion(&self) -> bool {
        self.0
    }
}

/// The environment refused to start playback (e.g. autoplay restrictions).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Playback rejected: {0}")]
pub struct PlaybackError(pub String);

/// A single audio element owned by the host.
pub trait AudioTrack {
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    fn is_paused(&self) -> bool;
    fn set_volume(&self, volume: f32);
    fn volume(&self) -> f32;
    fn set_muted(&self, muted: bool);
    fn is_muted(&self) -> bool;
    fn seek(&self, position: Duration);
    fn position(&self) -> Duration;
    /// `None` until the media metadata is known.
    fn duration(&self) -> Option<Duration>;
}

/// Moves keyboard focus inside revealed content.
pub trait FocusTarget {
    /// Focuses the first interactive element. Returns `false` if there is none.
    fn focus_first_interactive(&self) -> bool;
}
