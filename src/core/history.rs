// LogLens - core/history.rs
//
// The history ledger: create/update/delete/list over upload/chat sessions.
//
// The whole ledger lives in a single durable slot as a JSON array, newest
// first. Every operation loads the full list, transforms it and writes the
// full list back. The slot itself is reached through the `LedgerStore` port
// so business logic never touches a concrete store.
//
// Concurrent writers (two processes sharing one slot) can lose updates;
// a single writer per slot is assumed.

use crate::core::model::{FileDescriptor, HistoryEntry, HistoryUpdate};
use crate::util::error::LedgerError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

// =============================================================================
// Storage port
// =============================================================================

/// Durable slot holding the serialised ledger.
pub trait LedgerStore {
    /// Current ledger contents. A missing or unreadable slot is an empty
    /// ledger, never an error.
    fn load(&self) -> Vec<HistoryEntry>;

    /// Replace the slot contents with `entries`.
    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), LedgerError>;
}

/// Decode a raw slot value. `None` (missing) and malformed JSON both give an
/// empty ledger.
pub fn decode_slot(raw: Option<&str>) -> Vec<HistoryEntry> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<HistoryEntry>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "History slot is malformed; treating as empty");
            Vec::new()
        }
    }
}

/// Encode the ledger for storage in a slot.
pub fn encode_slot(entries: &[HistoryEntry]) -> Result<String, LedgerError> {
    serde_json::to_string(entries).map_err(|source| LedgerError::Serialise { source })
}

/// In-memory slot, used in tests and as a scratch ledger.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose slot already holds `raw` (possibly malformed).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
        }
    }

    /// Raw slot contents, as they would sit in durable storage.
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Vec<HistoryEntry> {
        decode_slot(self.slot.as_deref())
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), LedgerError> {
        self.slot = Some(encode_slot(entries)?);
        Ok(())
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// CRUD over `HistoryEntry`, backed by an injected `LedgerStore`.
#[derive(Debug)]
pub struct HistoryLedger<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> HistoryLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a new session for `file` at the front of the ledger.
    pub fn create(&mut self, file: &FileDescriptor) -> Result<HistoryEntry, LedgerError> {
        self.create_at(file, Utc::now())
    }

    /// `create` with an explicit creation time.
    ///
    /// The id is the creation time in milliseconds, bumped past the largest
    /// existing id when needed so ids stay unique. When no id is left above
    /// the largest one, the lowest unused id is taken instead.
    pub fn create_at(
        &mut self,
        file: &FileDescriptor,
        now: DateTime<Utc>,
    ) -> Result<HistoryEntry, LedgerError> {
        let mut entries = self.store.load();

        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);

        let entry = HistoryEntry {
            id: next_id(&entries, millis),
            file_name: file.name.clone(),
            file_size: file.size,
            file_type: file.file_type(),
            created_at: now,
            message_count: 0,
            last_message: String::new(),
            download_ref: file.download_ref.clone(),
        };

        entries.insert(0, entry.clone());
        self.store.save(&entries)?;

        tracing::info!(
            id = entry.id,
            file = %entry.file_name,
            size = entry.file_size,
            "History entry created"
        );
        Ok(entry)
    }

    /// Merge `update` into the entry with `id`.
    ///
    /// An unknown id is ignored. `message_count` never decreases: a smaller
    /// value than the stored one is dropped.
    pub fn update(&mut self, id: u64, update: HistoryUpdate) -> Result<(), LedgerError> {
        let mut entries = self.store.load();
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(id, "History update for unknown id ignored");
            return Ok(());
        };

        if let Some(count) = update.message_count {
            if count < entry.message_count {
                tracing::debug!(
                    id,
                    stored = entry.message_count,
                    requested = count,
                    "Ignoring message count decrease"
                );
            } else {
                entry.message_count = count;
            }
        }
        if let Some(last) = update.last_message {
            entry.last_message = last;
        }

        self.store.save(&entries)?;
        tracing::info!(id, "History entry updated");
        Ok(())
    }

    /// Remove the entry with `id`. An unknown id is ignored.
    pub fn delete(&mut self, id: u64) -> Result<(), LedgerError> {
        let mut entries = self.store.load();
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            tracing::debug!(id, "History delete for unknown id ignored");
            return Ok(());
        }

        self.store.save(&entries)?;
        tracing::info!(id, remaining = entries.len(), "History entry deleted");
        Ok(())
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.store.load()
    }

    /// The entry with `id`, if present.
    pub fn get(&self, id: u64) -> Option<HistoryEntry> {
        self.store.load().into_iter().find(|e| e.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// `max(millis, largest_id + 1)`, or the lowest free id once `largest_id`
/// is `u64::MAX`.
fn next_id(entries: &[HistoryEntry], millis: u64) -> u64 {
    let Some(largest) = entries.iter().map(|e| e.id).max() else {
        return millis;
    };
    if let Some(next) = largest.checked_add(1) {
        return millis.max(next);
    }

    let taken: HashSet<u64> = entries.iter().map(|e| e.id).collect();
    tracing::warn!(entries = entries.len(), "History id space exhausted; reusing a free id");
    // A ledger can never hold u64::MAX entries, so a gap always exists.
    (0..u64::MAX).find(|id| !taken.contains(id)).unwrap_or(0)
}
