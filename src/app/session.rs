// LogLens - app/session.rs
//
// Upload/chat session orchestration.
//
// The remote analysis service is reached through the `AnalysisService` port;
// transport is the implementor's concern. Successful uploads create a
// history entry and successful chat turns update it. Failures are returned
// to the caller unchanged and are never retried here.

use crate::core::history::{HistoryLedger, LedgerStore};
use crate::core::model::{FileDescriptor, HistoryEntry, HistoryUpdate};
use crate::core::upload::{validate_query, UploadPolicy};
use crate::util::constants::MESSAGES_PER_TURN;
use crate::util::error::{Result, ServiceError};

/// Acknowledgement returned by the service after an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
}

/// Request/response analysis backend.
pub trait AnalysisService {
    /// Send a file for indexing.
    fn upload(&self, file: &FileDescriptor, bytes: &[u8]) -> std::result::Result<UploadReceipt, ServiceError>;

    /// Ask a free-text question about the uploaded file.
    fn query(&self, query: &str) -> std::result::Result<String, ServiceError>;
}

/// One upload followed by any number of chat turns, recorded in the ledger.
pub struct ChatSession<'a, A: AnalysisService, S: LedgerStore> {
    service: &'a A,
    ledger: &'a mut HistoryLedger<S>,
    entry: HistoryEntry,
}

impl<'a, A: AnalysisService, S: LedgerStore> ChatSession<'a, A, S> {
    /// Gate and upload `file`, then record it in the ledger.
    ///
    /// Nothing is recorded when the gate or the service rejects the file.
    pub fn start(
        service: &'a A,
        ledger: &'a mut HistoryLedger<S>,
        policy: &UploadPolicy,
        file: &FileDescriptor,
        bytes: &[u8],
    ) -> Result<Self> {
        policy.check(file)?;

        let receipt = service.upload(file, bytes).map_err(|e| {
            tracing::warn!(file = %file.name, error = %e, "Upload failed");
            e
        })?;
        tracing::info!(file = %file.name, message = %receipt.message, "Upload accepted");

        let entry = ledger.create(file)?;
        Ok(Self {
            service,
            ledger,
            entry,
        })
    }

    /// Continue a previously recorded session. `None` if `id` is unknown.
    pub fn resume(service: &'a A, ledger: &'a mut HistoryLedger<S>, id: u64) -> Option<Self> {
        let entry = ledger.get(id)?;
        Some(Self {
            service,
            ledger,
            entry,
        })
    }

    /// Ask `query` and record the turn.
    ///
    /// The ledger only changes when the service answers.
    pub fn ask(&mut self, query: &str) -> Result<String> {
        let query = validate_query(query)?;

        let answer = self.service.query(query).map_err(|e| {
            tracing::warn!(id = self.entry.id, error = %e, "Query failed");
            e
        })?;

        let message_count = self.entry.message_count.saturating_add(MESSAGES_PER_TURN);
        self.ledger.update(
            self.entry.id,
            HistoryUpdate {
                message_count: Some(message_count),
                last_message: Some(answer.clone()),
            },
        )?;

        self.entry.message_count = message_count;
        self.entry.last_message = answer.clone();
        Ok(answer)
    }

    /// The ledger entry as of the last successful operation.
    pub fn entry(&self) -> &HistoryEntry {
        &self.entry
    }
}
