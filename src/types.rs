//! Core types and data structures for the ingestion metadata system

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema;

/// One row of the processed-date ledger
///
/// Entries are append-only: the same source date may appear more than once
/// across merges and is never de-duplicated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Calendar date of the source dataset partition, as `YYYY-MM-DD`
    pub source_date: String,
    /// Date the entry was recorded, as `YYYY-MM-DD`
    pub processed_at: String,
}

impl LedgerEntry {
    /// Create a new entry, stamping the processed date in the canonical format
    pub fn new(source_date: impl Into<String>, processed_at: NaiveDate) -> Self {
        Self {
            source_date: source_date.into(),
            processed_at: processed_at.format(schema::PROCESS_DATE_FORMAT).to_string(),
        }
    }
}

/// Serialization formats supported by the object store gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    /// Delimited text with a header row
    Csv,
    /// Columnar binary
    Parquet,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Parquet => write!(f, "parquet"),
        }
    }
}

/// Generic tabular payload exchanged with the object store gateway
///
/// Column names come from the header row; every data row holds one string
/// value per column, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Create a table with the given columns and no rows
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Encode as delimited text with a header row
    pub fn to_csv(&self, delimiter: u8) -> LedgerResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());
        wtr.write_record(&self.columns)
            .map_err(|e| LedgerError::Transport(format!("csv encode failed: {e}")))?;
        for row in &self.rows {
            wtr.write_record(row)
                .map_err(|e| LedgerError::Transport(format!("csv encode failed: {e}")))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| LedgerError::Transport(format!("csv encode failed: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| LedgerError::Transport(format!("csv encode produced invalid utf-8: {e}")))
    }

    /// Decode delimited text with a header row
    pub fn from_csv(data: &str, delimiter: u8) -> LedgerResult<Self> {
        // Flexible so ragged rows still decode; a header that does not match
        // the schema is the schema layer's call, not a transport failure.
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(data.as_bytes());
        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| LedgerError::Transport(format!("csv decode failed: {e}")))?
            .iter()
            .map(|c| c.to_string())
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record =
                record.map_err(|e| LedgerError::Transport(format!("csv decode failed: {e}")))?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Ok(Self { columns, rows })
    }
}

/// Result of reading an object through the gateway
///
/// Absence of the object is a variant, not an error: a missing ledger is the
/// benign "first run" case. Transport failures travel as `Err` and are never
/// reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// No object exists at the key
    Absent,
    /// The object exists and was decoded
    Present(TabularData),
}

/// What a successful `reconcile` call did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// Empty input batch: nothing was read or written
    NoNewDates,
    /// The ledger was replaced with the merged row set
    Written {
        /// Rows carried over from the prior ledger (zero on first run)
        prior_rows: usize,
        /// Rows appended from the new batch
        appended_rows: usize,
    },
}

/// Errors that can occur in the ingestion metadata system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("malformed ledger at '{key}': expected columns {expected:?}, found {found:?}")]
    MalformedLedger {
        key: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(FileFormat),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
