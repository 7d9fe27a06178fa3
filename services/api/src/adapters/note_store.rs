//! services/api/src/adapters/note_store.rs
//!
//! This module contains the note store adapter, the concrete implementation of
//! the `NoteRepository` port. Notes live in a single pretty-printed JSON array
//! file that is created (as `[]`) on first use.

use async_trait::async_trait;
use birthday_card_core::domain::Note;
use birthday_card_core::ports::{NoteRepository, PortError, PortResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::error;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed adapter that implements the `NoteRepository` port.
pub struct JsonFileNoteStore {
    path: PathBuf,
    /// Serializes file access within this process, so a read never sees a
    /// half-written file.
    write_lock: Mutex<()>,
}

impl JsonFileNoteStore {
    /// Creates a new `JsonFileNoteStore`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and an empty array file if missing.
    pub async fn ensure_file(&self) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| io_error(&self.path, e))?;
        }
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        if !exists {
            tokio::fs::write(&self.path, "[]")
                .await
                .map_err(|e| io_error(&self.path, e))?;
        }
        Ok(())
    }

    async fn read_records(&self) -> PortResult<Vec<NoteRecord>> {
        self.ensure_file().await?;
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        serde_json::from_str(&raw).map_err(|e| {
            error!("Notes file {} is not a JSON note array: {}", self.path.display(), e);
            PortError::Unexpected(e.to_string())
        })
    }

    async fn write_records(&self, records: &[NoteRecord]) -> PortResult<()> {
        let json =
            serde_json::to_string_pretty(records).map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| io_error(&self.path, e))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PortError {
    error!("Notes file {} I/O failure: {}", path.display(), e);
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Storage Record Struct
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: String,
    #[serde(default)]
    name: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email_sent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reply: Option<String>,
}

impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            name: self.name,
            message: self.message,
            created_at: self.created_at,
            email_sent: self.email_sent,
            email_error: self.email_error,
            reply: self.reply,
        }
    }

    fn from_domain(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            name: note.name.clone(),
            message: note.message.clone(),
            created_at: note.created_at,
            email_sent: note.email_sent,
            email_error: note.email_error.clone(),
            reply: note.reply.clone(),
        }
    }
}

//=========================================================================================
// `NoteRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteRepository for JsonFileNoteStore {
    async fn list_notes(&self) -> PortResult<Vec<Note>> {
        let _guard = self.write_lock.lock().await;
        let records = self.read_records().await?;
        Ok(records.into_iter().map(NoteRecord::to_domain).collect())
    }

    async fn append_note(&self, note: &Note) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        records.push(NoteRecord::from_domain(note));
        self.write_records(&records).await
    }

    async fn update_note(&self, note: &Note) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == note.id)
            .ok_or_else(|| PortError::NotFound(format!("note {}", note.id)))?;
        *slot = NoteRecord::from_domain(note);
        self.write_records(&records).await
    }
}
