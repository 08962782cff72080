//! The append-only game event log.
//!
//! Entries arrive with backend-assigned ids and are never removed, only
//! flagged deleted. The log is the sole persisted truth for scoring; every
//! derived value is rebuilt from [`EventLog::active_entries`].

use crate::domain::{EventId, LogEntry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("log entry {0} not found")]
    NotFound(EventId),
    #[error("log entry {0} already recorded")]
    DuplicateEvent(EventId),
}

/// Fields an existing entry may be amended with. Scoring fields (`kind`,
/// `participant_id`, `points`, `timestamp`) are deliberately not here:
/// a correction is a delete plus a fresh append, never an in-place edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub description: Option<String>,
    /// `Some(None)` clears the tag.
    pub tag: Option<Option<String>>,
}

/// In-memory event log for one game, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            entries: Vec::new(),
        }
    }

    /// Rebuild a log from entries fetched off the backend, preserving
    /// their order and deletion flags.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        EventLog { entries }
    }

    /// Append a new entry. The id must be the backend-assigned one.
    pub fn append(&mut self, entry: LogEntry) -> Result<(), LedgerError> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(LedgerError::DuplicateEvent(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Flag an entry deleted, keeping it in place for audit. Deleting an
    /// already-deleted entry succeeds as a no-op.
    pub fn soft_delete(&mut self, id: EventId) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        entry.is_deleted = true;
        Ok(())
    }

    /// Amend the display fields of an entry.
    pub fn edit(&mut self, id: EventId, patch: EntryPatch) -> Result<&LogEntry, LedgerError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(tag) = patch.tag {
            entry.tag = tag;
        }
        Ok(entry)
    }

    pub fn get(&self, id: EventId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.get(id).is_some()
    }

    /// Non-deleted entries in replay order.
    ///
    /// Entries are appended in real time, so insertion order normally
    /// matches timestamp order already; the explicit stable sort protects
    /// replay against logs reloaded out of order.
    pub fn active_entries(&self) -> Vec<&LogEntry> {
        let mut active: Vec<&LogEntry> = self.entries.iter().filter(|e| !e.is_deleted).collect();
        active.sort_by_key(|e| e.timestamp);
        active
    }

    /// Every entry, deleted ones included, in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
