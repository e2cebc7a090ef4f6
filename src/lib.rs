//! # Ingestion Core
//!
//! Core metadata reconciliation for incremental dataset ingestion. Tracks
//! which source dates of a periodically-refreshed external dataset have
//! already been processed, so a scheduled extraction job can resume
//! incrementally without reprocessing or skipping dates.
//!
//! ## Features
//!
//! - **Processed-date ledger**: append-only two-column record of source
//!   dates and when they were recorded, stored as a single object
//! - **Reconciliation engine**: idempotent merge of new batches into the
//!   ledger, with lazy creation on first run
//! - **Schema validation**: typed rejection of corrupted or incompatible
//!   ledgers before anything is overwritten
//! - **Storage abstraction**: backend-agnostic design with a trait-based
//!   object store gateway
//!
//! ## Quick Start
//!
//! ```rust
//! use ingestion_core::{MemoryObjectStore, ReconciliationEngine};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = MemoryObjectStore::new();
//! let engine = ReconciliationEngine::new(store);
//!
//! let batch = vec!["2021-04-16".to_string(), "2021-04-17".to_string()];
//! engine.reconcile(&batch, "meta.csv").await.unwrap();
//!
//! let processed = engine.processed_dates("meta.csv").await.unwrap();
//! assert_eq!(processed.len(), 2);
//! # });
//! ```

pub mod reconciliation;
pub mod schema;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::{ReconciliationEngine, DEFAULT_DELIMITER};
pub use schema::{LedgerSchema, PROCESSED_AT_COL, SOURCE_DATE_COL};
pub use traits::*;
pub use types::*;
pub use utils::MemoryObjectStore;
