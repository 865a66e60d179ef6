//! Thread-safe, append-only request recorder

use std::sync::RwLock;

use crate::domain::record::RequestRecord;
use crate::domain::DomainError;

/// Default bound on retained records
pub const DEFAULT_MAX_RECORDS: usize = 100_000;

/// Append-only log of per-request outcome records, with an atomic clear.
///
/// Records are immutable once appended, so concurrent read safety reduces to
/// the lock around the vector: a snapshot is a point-in-time clone and never
/// observes a torn record or a half-applied reset. The log is bounded;
/// appending past `max_records` evicts the oldest entries.
#[derive(Debug)]
pub struct RequestRecorder {
    records: RwLock<Vec<RequestRecord>>,
    max_records: usize,
}

impl RequestRecorder {
    /// Create a recorder with the default record bound
    pub fn new() -> Self {
        Self::with_max_records(DEFAULT_MAX_RECORDS)
    }

    /// Create a recorder with a custom record bound
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_records: max_records.max(1),
        }
    }

    /// Append a completed-request record
    pub fn append(&self, record: RequestRecord) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        records.push(record);

        if records.len() > self.max_records {
            let overflow = records.len() - self.max_records;
            records.drain(0..overflow);
        }

        Ok(())
    }

    /// Point-in-time copy of all records, in append order
    pub fn snapshot(&self) -> Result<Vec<RequestRecord>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.clone())
    }

    /// Atomically clear all records
    pub fn reset(&self) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        records.clear();
        Ok(())
    }

    /// Number of retained records
    pub fn len(&self) -> Result<usize, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }
}

impl Default for RequestRecorder {
    fn default() -> Self {
        Self::new()
    }
}
