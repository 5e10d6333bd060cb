//! In-memory table backend.
//!
//! Thread-safe reference implementation of [`TableStore`] over an
//! `RwLock`-guarded row matrix. Intended for embedded usage and tests;
//! unlike a remote sheet it really is transactional per call, but callers
//! must not rely on that.

use std::sync::RwLock;

use crate::schema::{self, WORKSHEET_NAME};
use crate::storage::traits::{CasOutcome, CellAddr, CellUpdate, StoreError, TableStore};

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    header_frozen: bool,
}

impl TableState {
    fn provisioned(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Resolves a one-based row number, extending the row to hold `column`.
    fn cell_mut(&mut self, addr: CellAddr) -> Result<&mut String, StoreError> {
        let index = addr.row as usize;
        if index == 0 || index > self.rows.len() {
            return Err(StoreError::RowOutOfRange { row: addr.row });
        }
        let row = &mut self.rows[index - 1];
        let col = addr.column.index();
        if row.len() <= col {
            row.resize(col + 1, String::new());
        }
        Ok(&mut row[col])
    }

    fn cell(&self, addr: CellAddr) -> Result<String, StoreError> {
        let index = addr.row as usize;
        if index == 0 || index > self.rows.len() {
            return Err(StoreError::RowOutOfRange { row: addr.row });
        }
        Ok(self.rows[index - 1]
            .get(addr.column.index())
            .cloned()
            .unwrap_or_default())
    }
}

/// Thread-safe in-memory inventory table.
#[derive(Debug, Default)]
pub struct InMemoryTable {
    state: RwLock<TableState>,
}

impl InMemoryTable {
    /// Creates an empty, unprovisioned table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table seeded with the given rows (header included).
    ///
    /// Useful for tests that need pre-existing content, including rows a
    /// remote operator wrote by hand.
    #[must_use]
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            state: RwLock::new(TableState {
                header_frozen: !rows.is_empty(),
                rows,
            }),
        }
    }

    /// Returns true once the header row exists and is frozen.
    pub fn is_header_frozen(&self) -> Result<bool, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("frozen"))?;
        Ok(state.header_frozen)
    }

    /// Total number of rows, header included.
    pub fn row_count(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("row_count"))?;
        Ok(state.rows.len())
    }
}

impl TableStore for InMemoryTable {
    fn ensure_table(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("ensure_table"))?;
        if !state.provisioned() {
            state.rows.push(schema::header_row());
            state.header_frozen = true;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("read_all"))?;
        if !state.provisioned() {
            return Err(StoreError::SchemaMissing(WORKSHEET_NAME.to_string()));
        }
        Ok(state.rows.clone())
    }

    fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("append_rows"))?;
        if !state.provisioned() {
            return Err(StoreError::SchemaMissing(WORKSHEET_NAME.to_string()));
        }
        state.rows.extend(rows);
        Ok(())
    }

    fn update_cells(&self, updates: &[CellUpdate]) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("update_cells"))?;

        // Validate every address before writing anything, so a bad batch
        // behaves like one rejected round trip rather than a partial write.
        for update in updates {
            let index = update.addr.row as usize;
            if index == 0 || index > state.rows.len() {
                return Err(StoreError::RowOutOfRange {
                    row: update.addr.row,
                });
            }
        }

        for update in updates {
            *state.cell_mut(update.addr)? = update.value.clone();
        }
        Ok(())
    }

    fn compare_and_swap(
        &self,
        addr: CellAddr,
        expected: &str,
        value: &str,
    ) -> Result<CasOutcome, StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("compare_and_swap"))?;

        let actual = state.cell(addr)?;
        if actual != expected {
            return Ok(CasOutcome::Mismatch { actual });
        }
        *state.cell_mut(addr)? = value.to_string();
        Ok(CasOutcome::Applied)
    }
}
