//! Canonical shape of the processed-date ledger

use std::collections::BTreeSet;

use crate::types::{LedgerEntry, LedgerError, LedgerResult, TabularData};

/// Column holding the source dataset partition date
pub const SOURCE_DATE_COL: &str = "source_date";
/// Column holding the date the entry was recorded
pub const PROCESSED_AT_COL: &str = "processed_at";

/// `chrono` format string for source dates at rest
pub const SOURCE_DATE_FORMAT: &str = "%Y-%m-%d";
/// `chrono` format string for processed-at stamps at rest
pub const PROCESS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Typed description of the two-column ledger schema
///
/// Equality against a stored ledger's header is set-of-names equality:
/// extra, missing, or renamed columns all make the ledger malformed, while a
/// merely reordered header does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSchema {
    columns: [&'static str; 2],
}

impl LedgerSchema {
    /// The canonical ledger schema
    pub fn expected() -> Self {
        Self {
            columns: [SOURCE_DATE_COL, PROCESSED_AT_COL],
        }
    }

    /// Column names in canonical order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.to_string()).collect()
    }

    /// Whether a stored header matches this schema as a set of names
    pub fn matches(&self, columns: &[String]) -> bool {
        let expected: BTreeSet<&str> = self.columns.iter().copied().collect();
        let found: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
        expected == found
    }

    /// Extract the ledger entries from a schema-valid table
    ///
    /// Rows are returned in the table's row order, with values picked by
    /// column name so a reordered header still reads correctly. Call only
    /// after [`matches`](Self::matches) has accepted the header; a header
    /// missing either column is reported as malformed.
    pub fn entries_from_table(&self, key: &str, table: &TabularData) -> LedgerResult<Vec<LedgerEntry>> {
        let malformed = || LedgerError::MalformedLedger {
            key: key.to_string(),
            expected: self.column_names(),
            found: table.columns.clone(),
        };
        let source_idx = table
            .columns
            .iter()
            .position(|c| c == SOURCE_DATE_COL)
            .ok_or_else(malformed)?;
        let processed_idx = table
            .columns
            .iter()
            .position(|c| c == PROCESSED_AT_COL)
            .ok_or_else(malformed)?;

        let mut entries = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let source_date = row.get(source_idx).ok_or_else(malformed)?;
            let processed_at = row.get(processed_idx).ok_or_else(malformed)?;
            entries.push(LedgerEntry {
                source_date: source_date.clone(),
                processed_at: processed_at.clone(),
            });
        }
        Ok(entries)
    }

    /// Build a table from entries, columns in canonical order
    pub fn table_from_entries(&self, entries: &[LedgerEntry]) -> TabularData {
        TabularData {
            columns: self.column_names(),
            rows: entries
                .iter()
                .map(|e| vec![e.source_date.clone(), e.processed_at.clone()])
                .collect(),
        }
    }
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self::expected()
    }
}
