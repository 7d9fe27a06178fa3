pub mod mailer;
pub mod note_store;
pub mod notes_client;

pub use mailer::{notifier_from_config, SmtpNotifier, UnconfiguredNotifier};
pub use note_store::JsonFileNoteStore;
pub use notes_client::HttpNotesClient;
