//! Traits for object store abstraction and extensibility

use async_trait::async_trait;

use crate::types::{FileFormat, LedgerResult, ReadOutcome, TabularData};

/// Storage abstraction for the object store holding the ledger
///
/// This trait allows the reconciliation core to work with any key-addressed
/// object store (S3-compatible services, local filesystems, in-memory, etc.)
/// by implementing these methods. Handles are passed to the engine
/// explicitly; credential lookup and session state belong to the
/// implementation, never to this crate.
///
/// A single `write_tabular` call replaces the whole object and is assumed
/// atomic at the storage layer: a reader never observes a partially-written
/// object. That atomicity does not extend across a read-then-write pair.
#[async_trait]
pub trait ObjectStoreGateway: Send + Sync {
    /// List all object keys under a prefix, in stable order
    async fn list(&self, prefix: &str) -> LedgerResult<Vec<String>>;

    /// Read an object as tabular data
    ///
    /// A missing object is reported as [`ReadOutcome::Absent`], not as an
    /// error. Any other failure (network, permission, undecodable content)
    /// is a transport error.
    async fn read_tabular(&self, key: &str, delimiter: u8) -> LedgerResult<ReadOutcome>;

    /// Write tabular data as a single whole-object replacement
    ///
    /// An empty row set is a success no-op: no write is performed and an
    /// informational record is logged. Fails with
    /// [`LedgerError::UnsupportedFormat`](crate::types::LedgerError::UnsupportedFormat)
    /// if the implementation does not support the requested format.
    async fn write_tabular(
        &self,
        data: &TabularData,
        key: &str,
        format: FileFormat,
    ) -> LedgerResult<()>;
}
