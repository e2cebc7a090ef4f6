//! Reconciliation engine merging newly processed dates into the durable ledger
//!
//! A scheduled extraction job hands this engine the dates it just ingested;
//! the engine folds them into the processed-date ledger stored behind an
//! [`ObjectStoreGateway`], creating the ledger on first run and rejecting a
//! ledger whose schema no longer matches.

use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::schema::LedgerSchema;
use crate::traits::ObjectStoreGateway;
use crate::types::{FileFormat, LedgerEntry, LedgerError, LedgerResult, ReadOutcome, ReconcileOutcome};

/// Default column delimiter for ledgers at rest
pub const DEFAULT_DELIMITER: u8 = b',';

/// Engine that merges new-entry batches into an object-store backed ledger
pub struct ReconciliationEngine<S: ObjectStoreGateway> {
    store: S,
    schema: LedgerSchema,
    delimiter: u8,
    format: FileFormat,
}

impl<S: ObjectStoreGateway> ReconciliationEngine<S> {
    /// Create an engine persisting comma-delimited text ledgers
    pub fn new(store: S) -> Self {
        Self::with_format(store, DEFAULT_DELIMITER, FileFormat::Csv)
    }

    /// Create an engine with an explicit delimiter and persistence format
    pub fn with_format(store: S, delimiter: u8, format: FileFormat) -> Self {
        Self {
            store,
            schema: LedgerSchema::expected(),
            delimiter,
            format,
        }
    }

    /// Merge a batch of newly processed source dates into the ledger
    ///
    /// Every entry in the batch is stamped with today's date. The existing
    /// ledger (if any) is read, schema-validated, concatenated with the
    /// batch (old rows first, both sides keeping their original order, no
    /// de-duplication), and written back as a single whole-object replace.
    ///
    /// An empty batch is a success no-op that performs no read and no write.
    /// A missing ledger is not an error: the batch alone becomes the fresh
    /// ledger. A ledger whose column set does not match the expected schema
    /// aborts with [`LedgerError::MalformedLedger`] before anything is
    /// written, leaving the stored object untouched.
    ///
    /// There is no locking around the read-then-write pair: two callers
    /// reconciling the same key concurrently can lose one caller's rows.
    /// The design assumes one scheduled caller per ledger key; enforcing
    /// that exclusivity is the scheduler's responsibility.
    pub async fn reconcile(
        &self,
        new_dates: &[String],
        ledger_key: &str,
    ) -> LedgerResult<ReconcileOutcome> {
        self.reconcile_with_timestamp(new_dates, ledger_key, Local::now().date_naive())
            .await
    }

    /// Like [`reconcile`](Self::reconcile), with an explicit processed-at
    /// date instead of the wall clock. Useful for replays and tests that
    /// need a frozen timestamp.
    pub async fn reconcile_with_timestamp(
        &self,
        new_dates: &[String],
        ledger_key: &str,
        processed_at: NaiveDate,
    ) -> LedgerResult<ReconcileOutcome> {
        if new_dates.is_empty() {
            info!(ledger_key, "no new dates to record, nothing will be written");
            return Ok(ReconcileOutcome::NoNewDates);
        }

        let batch: Vec<LedgerEntry> = new_dates
            .iter()
            .map(|date| LedgerEntry::new(date.clone(), processed_at))
            .collect();

        let prior = match self.store.read_tabular(ledger_key, self.delimiter).await? {
            ReadOutcome::Absent => {
                debug!(ledger_key, "no prior ledger, initializing from batch");
                Vec::new()
            }
            ReadOutcome::Present(table) => {
                if !self.schema.matches(&table.columns) {
                    return Err(LedgerError::MalformedLedger {
                        key: ledger_key.to_string(),
                        expected: self.schema.column_names(),
                        found: table.columns,
                    });
                }
                self.schema.entries_from_table(ledger_key, &table)?
            }
        };

        let prior_rows = prior.len();
        let appended_rows = batch.len();
        let mut merged = prior;
        merged.extend(batch);

        let table = self.schema.table_from_entries(&merged);
        self.store
            .write_tabular(&table, ledger_key, self.format)
            .await?;
        info!(ledger_key, prior_rows, appended_rows, "ledger reconciled");

        Ok(ReconcileOutcome::Written {
            prior_rows,
            appended_rows,
        })
    }

    /// Distinct source dates already recorded in the ledger, ascending
    ///
    /// Reads the ledger back through the gateway with the same schema
    /// validation as [`reconcile`](Self::reconcile). An absent ledger yields
    /// an empty list. Callers use this to compute the next extraction
    /// window.
    pub async fn processed_dates(&self, ledger_key: &str) -> LedgerResult<Vec<String>> {
        let table = match self.store.read_tabular(ledger_key, self.delimiter).await? {
            ReadOutcome::Absent => return Ok(Vec::new()),
            ReadOutcome::Present(table) => table,
        };
        if !self.schema.matches(&table.columns) {
            return Err(LedgerError::MalformedLedger {
                key: ledger_key.to_string(),
                expected: self.schema.column_names(),
                found: table.columns,
            });
        }
        let entries = self.schema.entries_from_table(ledger_key, &table)?;
        let distinct: BTreeSet<String> = entries.into_iter().map(|e| e.source_date).collect();
        Ok(distinct.into_iter().collect())
    }

    /// Access the underlying gateway handle
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryObjectStore;

    fn dates(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fresh_ledger_row_order_is_deterministic() {
        let store = MemoryObjectStore::new();
        let engine = ReconciliationEngine::new(store.clone());
        let stamp = NaiveDate::from_ymd_opt(2021, 4, 18).unwrap();

        let outcome = engine
            .reconcile_with_timestamp(&dates(&["2021-04-16", "2021-04-17"]), "meta.csv", stamp)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::Written {
                prior_rows: 0,
                appended_rows: 2
            }
        );

        let raw = store.raw_object("meta.csv").unwrap();
        assert_eq!(
            raw,
            "source_date,processed_at\n2021-04-16,2021-04-18\n2021-04-17,2021-04-18\n"
        );
    }

    #[tokio::test]
    async fn test_malformed_ledger_is_left_untouched() {
        let store = MemoryObjectStore::new();
        let bad = "wrong_columnprocessed_at\n2021-04-12,2021-04-14\n";
        store.put_raw_object("meta.csv", bad);

        let engine = ReconciliationEngine::new(store.clone());
        let err = engine
            .reconcile(&dates(&["2021-04-16"]), "meta.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::MalformedLedger { .. }));
        assert_eq!(store.raw_object("meta.csv").unwrap(), bad);
    }

    #[tokio::test]
    async fn test_processed_dates_deduplicates_and_sorts() {
        let store = MemoryObjectStore::new();
        let engine = ReconciliationEngine::new(store.clone());
        let stamp = NaiveDate::from_ymd_opt(2021, 4, 18).unwrap();

        engine
            .reconcile_with_timestamp(
                &dates(&["2021-04-17", "2021-04-16", "2021-04-17"]),
                "meta.csv",
                stamp,
            )
            .await
            .unwrap();

        let processed = engine.processed_dates("meta.csv").await.unwrap();
        assert_eq!(processed, dates(&["2021-04-16", "2021-04-17"]));
    }
}
