//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use birthday_card_core::ports::{NoteRepository, NotificationService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub notifier: Arc<dyn NotificationService>,
    pub config: Arc<Config>,
}
