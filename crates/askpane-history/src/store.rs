//! JSON-file backed history store
//!
//! Entries are kept most-recent-first in a single JSON array. Every operation
//! holds the store lock across its read-modify-write so concurrent single and
//! bulk deletes cannot interleave.

use crate::entry::HistoryEntry;
use askpane_core::format::truncate_text;
use askpane_core::{read_json, write_json};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Entries kept before the oldest are evicted
pub const MAX_ENTRIES: usize = 100;

/// UTF-16 code units of `selected_text` kept per entry, as the extension counts them
pub const MAX_TEXT_LENGTH: usize = 500;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub success: bool,
    pub deleted_count: usize,
    pub failed_ids: Vec<String>,
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The lock only orders file access, there is no in-memory state to poison
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        write_json(&self.path, &entries)?;
        Ok(())
    }

    /// Insert at the front, returning the entry id
    pub fn add_entry(&self, mut entry: HistoryEntry) -> Result<String, HistoryError> {
        if entry.id.is_empty() {
            entry.id = uuid::Uuid::new_v4().to_string();
        }
        entry.selected_text = truncate_text(&entry.selected_text, MAX_TEXT_LENGTH);
        let id = entry.id.clone();

        let _guard = self.guard();
        let mut entries = self.load()?;
        entries.insert(0, entry);
        entries.truncate(MAX_ENTRIES);
        self.persist(&entries)?;

        tracing::debug!(%id, total = entries.len(), "history entry added");
        Ok(id)
    }

    /// All entries, most recent first
    pub fn get_history(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let _guard = self.guard();
        self.load()
    }

    pub fn get_recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.get_history()?;
        entries.truncate(limit);
        Ok(entries)
    }

    pub fn get_entry(&self, id: &str) -> Result<Option<HistoryEntry>, HistoryError> {
        Ok(self.get_history()?.into_iter().find(|e| e.id == id))
    }

    /// Remove one entry; `false` when no entry has that id
    pub fn delete_entry(&self, id: &str) -> Result<bool, HistoryError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        let Some(index) = entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        entries.remove(index);
        self.persist(&entries)?;
        Ok(true)
    }

    /// Remove several entries in one write
    pub fn delete_entries(&self, ids: &[String]) -> Result<DeleteReport, HistoryError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        let before = entries.len();

        let failed_ids: Vec<String> = ids
            .iter()
            .filter(|id| !entries.iter().any(|e| &e.id == *id))
            .cloned()
            .collect();
        entries.retain(|e| !ids.contains(&e.id));

        let deleted_count = before - entries.len();
        if deleted_count > 0 {
            self.persist(&entries)?;
        }

        tracing::debug!(
            deleted_count,
            failed = failed_ids.len(),
            "history entries deleted"
        );
        Ok(DeleteReport {
            success: failed_ids.is_empty(),
            deleted_count,
            failed_ids,
        })
    }

    pub fn clear_history(&self) -> Result<(), HistoryError> {
        let _guard = self.guard();
        self.persist(&[])
    }

    /// Case-insensitive match on query (or selection) and answer text
    pub fn search_history(&self, term: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
        let term = term.to_lowercase();
        let mut entries = self.get_history()?;
        entries.retain(|e| {
            e.query_text().to_lowercase().contains(&term)
                || e.answer
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&term))
        });
        Ok(entries)
    }

    pub fn filter_by_agent(&self, agent_id: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.get_history()?;
        entries.retain(|e| e.agent_id.as_deref() == Some(agent_id));
        Ok(entries)
    }

    /// Pretty JSON array of every entry
    pub fn export_history(&self) -> Result<String, HistoryError> {
        let entries = self.get_history()?;
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}
