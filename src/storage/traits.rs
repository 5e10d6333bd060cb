//! Abstract store contract.
//!
//! The backing table is latency-heavy, row-oriented, and has no native
//! query or transaction support, so the contract is deliberately small:
//! everything higher-level (eligibility, claims, sweeps) is built from a
//! full snapshot read plus append and compare-and-swap primitives. No
//! method promises multi-row atomicity across the network boundary —
//! callers must treat a failed call as unknown partial state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Column;

/// Errors that can occur at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Authentication or network failure reaching the store.
    ///
    /// Fatal to the current operation; surfaced to the caller and never
    /// retried internally.
    #[error("connection error: {0}")]
    Connection(String),

    /// The expected worksheet does not exist yet.
    ///
    /// Recovered automatically by [`TableStore::ensure_table`]; callers of
    /// the engine never observe it.
    #[error("worksheet missing: {0}")]
    SchemaMissing(String),

    /// A cell address pointed past the end of the table.
    #[error("row {row} is out of range")]
    RowOutOfRange {
        /// One-based row number that was addressed.
        row: u32,
    },

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Address of a single cell: one-based row number plus canonical column.
///
/// Row numbers are permanent — once appended, a row's number is its address
/// for every in-place update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddr {
    /// One-based row number (row 1 is the frozen header).
    pub row: u32,
    /// Canonical column.
    pub column: Column,
}

impl CellAddr {
    /// Creates a cell address.
    #[must_use]
    pub const fn new(row: u32, column: Column) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for CellAddr {
    /// A1 notation, e.g. `K17`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column.letter(), self.row)
    }
}

/// One single-cell write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    /// Target cell.
    pub addr: CellAddr,
    /// New cell text.
    pub value: String,
}

impl CellUpdate {
    /// Creates a cell update.
    #[must_use]
    pub fn new(addr: CellAddr, value: impl Into<String>) -> Self {
        Self {
            addr,
            value: value.into(),
        }
    }
}

/// Result of a compare-and-swap attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasOutcome {
    /// The cell held the expected text and now holds the new text.
    Applied,
    /// The cell held something else; nothing was written.
    Mismatch {
        /// The text actually found in the cell.
        actual: String,
    },
}

impl CasOutcome {
    /// Returns true if the swap was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Row-level access to the backing table.
///
/// # Contract
/// - `read_all` returns every row including the header, in file order; rows
///   may be shorter than the canonical column count and callers normalize.
/// - `append_rows` appends a block in one call, preserving order within the
///   block. It is best-effort across the network boundary: a failure does
///   not guarantee zero rows were appended remotely.
/// - `update_cells` applies discontiguous single-cell writes in one round
///   trip.
/// - `compare_and_swap` is the only atomic primitive; all claim semantics
///   are built on it.
pub trait TableStore: Send + Sync {
    /// Opens the backing worksheet, creating it with canonical headers and
    /// a frozen header row when missing. Idempotent.
    fn ensure_table(&self) -> Result<(), StoreError>;

    /// Returns every row, header included, in file order.
    fn read_all(&self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Appends a block of rows as a single call, preserving order.
    fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), StoreError>;

    /// Writes multiple discontiguous cells in one round trip.
    fn update_cells(&self, updates: &[CellUpdate]) -> Result<(), StoreError>;

    /// Atomically replaces a cell's text if it currently equals `expected`.
    fn compare_and_swap(
        &self,
        addr: CellAddr,
        expected: &str,
        value: &str,
    ) -> Result<CasOutcome, StoreError>;
}
