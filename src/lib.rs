//! # stockroom - Spreadsheet-backed credential inventory
//!
//! stockroom tracks a pool of credential records stored as rows in a
//! spreadsheet-backed table: bulk ingestion of pipe-delimited text blocks,
//! FIFO or keyword-filtered withdrawal that grants each record to at most
//! one caller, and a status-refresh sweep over derived metric columns.
//!
//! ## Core Concepts
//!
//! - **Record**: one claimable credential set, one table row
//! - **StockNote**: tagged availability marker, serialized to text only at
//!   the store boundary (`"New"` / `"Taken {timestamp}"`)
//! - **Batch**: a labeled group of records, delimited only by position
//! - **Claim**: a per-row compare-and-swap on the stock-note cell, so two
//!   concurrent withdrawals can never be granted the same record
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockroom::{
//!     FixedProbe, IngestBuilder, InMemoryTable, StockEngine, WithdrawBuilder,
//! };
//!
//! let store = Arc::new(InMemoryTable::new());
//! let probe = Arc::new(FixedProbe::default());
//! let engine = StockEngine::new(store, probe);
//!
//! engine.ingest(
//!     IngestBuilder::new()
//!         .batch_label("Mexico 27/12")
//!         .raw_text("u1|p1|mail1|mp1|2fa1|x1\nu2|p2")
//!         .build()?,
//! )?;
//!
//! let outcome = engine.withdraw(
//!     WithdrawBuilder::new().quantity(15).keyword("Mexico").build()?,
//! )?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod claim;
pub mod error;
pub mod export;
pub mod parse;
pub mod probe;
pub mod record;
pub mod schema;

// Requests, storage, and execution
pub mod engine;
pub mod operations;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use claim::{ClaimId, WithdrawReceipt};
pub use error::{StockError, StockResult, ValidationError};
pub use parse::ParsedLine;
pub use probe::{FixedProbe, MetricProbe, ProbeError, ProbeMetrics};
pub use record::{Record, StockNote};
pub use schema::Column;

pub use engine::{
    EngineConfig, IngestReceipt, StockCounts, StockEngine, SweepReport, WithdrawOutcome,
};
pub use operations::{IngestBuilder, IngestRequest, WithdrawBuilder, WithdrawRequest};
pub use storage::{CasOutcome, CellAddr, CellUpdate, InMemoryTable, StoreError, TableStore};
