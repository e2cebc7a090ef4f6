//! In-memory object store implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::traits::ObjectStoreGateway;
use crate::types::{FileFormat, LedgerError, LedgerResult, ReadOutcome, TabularData};

/// In-memory object store for testing and development
///
/// Objects are held as CSV-encoded strings keyed by object key, so stored
/// content matches what a delimited-text object store would hold at rest.
/// Only [`FileFormat::Csv`] is supported on the write path.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
    delimiter: u8,
}

impl MemoryObjectStore {
    /// Create a new store using comma-delimited encoding
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            writes: Arc::new(AtomicUsize::new(0)),
            delimiter: b',',
        }
    }

    /// Clear all objects (useful for testing)
    pub fn clear(&self) {
        self.objects.write().unwrap().clear();
    }

    /// Raw stored bytes of an object, if present
    pub fn raw_object(&self, key: &str) -> Option<String> {
        self.objects.read().unwrap().get(key).cloned()
    }

    /// Store raw bytes directly, bypassing the tabular write path
    pub fn put_raw_object(&self, key: &str, content: &str) {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), content.to_string());
    }

    /// Number of writes that actually replaced an object
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStoreGateway for MemoryObjectStore {
    async fn list(&self, prefix: &str) -> LedgerResult<Vec<String>> {
        let objects = self.objects.read().unwrap();
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn read_tabular(&self, key: &str, delimiter: u8) -> LedgerResult<ReadOutcome> {
        let content = match self.objects.read().unwrap().get(key) {
            Some(content) => content.clone(),
            None => return Ok(ReadOutcome::Absent),
        };
        debug!(key, "reading object");
        let table = TabularData::from_csv(&content, delimiter)?;
        Ok(ReadOutcome::Present(table))
    }

    async fn write_tabular(
        &self,
        data: &TabularData,
        key: &str,
        format: FileFormat,
    ) -> LedgerResult<()> {
        if data.is_empty() {
            info!(key, "empty row set, nothing will be written");
            return Ok(());
        }
        if format != FileFormat::Csv {
            return Err(LedgerError::UnsupportedFormat(format));
        }
        let encoded = data.to_csv(self.delimiter)?;
        info!(key, rows = data.rows.len(), "writing object");
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), encoded);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
