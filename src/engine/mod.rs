//! Execution engine for inventory operations.
//!
//! [`StockEngine`] applies validated requests against a pluggable
//! [`TableStore`]: bulk ingestion (append-only), FIFO/keyword withdrawal
//! (per-row compare-and-swap claims), the status-refresh sweep, and
//! inventory counts. The engine is a pure function of
//! (table snapshot, request) — it keeps no mutable session state of its own.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::claim::{ClaimId, WithdrawReceipt};
use crate::error::StockResult;
use crate::operations::{IngestRequest, WithdrawRequest};
use crate::parse;
use crate::probe::MetricProbe;
use crate::record::{self, Record, StockNote};
use crate::schema::{self, Column};
use crate::storage::{CasOutcome, CellAddr, CellUpdate, TableStore};

/// Number of fully-empty spacer rows emitted before each batch header.
pub const DEFAULT_SPACER_ROWS: usize = 5;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Spacer rows inserted before each batch header.
    pub spacer_rows: usize,
    /// Operator name recorded in taken markers and receipts.
    pub operator: Option<String>,
    /// Lifecycle status that qualifies a row for the refresh sweep.
    /// Any other status is treated as indicating removal.
    pub qualifying_status: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spacer_rows: DEFAULT_SPACER_ROWS,
            operator: None,
            qualifying_status: record::LIFECYCLE_ACTIVE.to_string(),
        }
    }
}

/// Result of a bulk ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Label the batch was ingested under.
    pub batch_label: String,
    /// Number of data rows written.
    pub data_rows: usize,
    /// Total rows appended, structural rows included. Zero when the input
    /// yielded no data rows (nothing is written at all in that case).
    pub rows_appended: usize,
}

/// Result of a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawOutcome {
    /// At least one record was claimed.
    Fulfilled(WithdrawReceipt),
    /// No eligible record existed. A normal condition, not an error, and
    /// stable under retry: withdrawing from an exhausted pool keeps
    /// returning this.
    Exhausted,
}

impl WithdrawOutcome {
    /// Returns the receipt of a fulfilled withdrawal.
    #[must_use]
    pub const fn receipt(&self) -> Option<&WithdrawReceipt> {
        match self {
            Self::Fulfilled(receipt) => Some(receipt),
            Self::Exhausted => None,
        }
    }

    /// Returns true if the inventory had nothing eligible.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Result of a status-refresh sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// Data rows whose lifecycle status qualified for probing.
    pub scanned: usize,
    /// Rows whose metric cells were written.
    pub updated: usize,
    /// Rows skipped because the probe or the per-row write failed.
    pub skipped: usize,
}

/// Aggregate inventory counts over data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockCounts {
    /// All data rows (non-empty identifier).
    pub total: usize,
    /// Data rows still claimable.
    pub available: usize,
    /// Data rows carrying a taken marker.
    pub taken: usize,
}

/// The inventory execution engine.
#[derive(Clone)]
pub struct StockEngine {
    store: Arc<dyn TableStore>,
    probe: Arc<dyn MetricProbe>,
    config: EngineConfig,
}

impl StockEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn TableStore>, probe: Arc<dyn MetricProbe>) -> Self {
        Self::with_config(store, probe, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn TableStore>,
        probe: Arc<dyn MetricProbe>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            probe,
            config,
        }
    }

    /// Get a reference to the table store.
    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ingests a block of raw pipe-delimited text as one batch.
    ///
    /// Appends spacer rows, one batch-header row, and one data row per
    /// non-blank input line, all in a single store call. Yields zero data
    /// rows for blank input and performs no write at all in that case.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Store` when the store boundary fails; the block
    /// append is best-effort and a failure leaves the remote row count
    /// unknown.
    pub fn ingest(&self, request: IngestRequest) -> StockResult<IngestReceipt> {
        self.store.ensure_table()?;

        let lines = parse::parse_block(&request.raw_text);
        if lines.is_empty() {
            return Ok(IngestReceipt {
                batch_label: request.batch_label,
                data_rows: 0,
                rows_appended: 0,
            });
        }

        let data_rows = lines.len();
        let mut rows = Vec::with_capacity(self.config.spacer_rows + 1 + data_rows);
        for _ in 0..self.config.spacer_rows {
            rows.push(schema::blank_row());
        }
        rows.push(record::batch_header_row(&request.batch_label, Utc::now()));
        for line in lines {
            rows.push(line.into_record(&request.batch_label).into_row());
        }

        let rows_appended = rows.len();
        self.store.append_rows(rows)?;
        tracing::debug!(
            batch = %request.batch_label,
            data_rows,
            "ingested batch"
        );

        Ok(IngestReceipt {
            batch_label: request.batch_label,
            data_rows,
            rows_appended,
        })
    }

    /// Withdraws up to `request.quantity` records, earliest row first.
    ///
    /// Scans the snapshot in file order and claims each eligible row by
    /// compare-and-swapping its stock-note cell from the exact text the
    /// snapshot read. A row claimed by a concurrent caller between the read
    /// and the swap fails the comparison and is skipped — the same record
    /// is never granted twice; the scan just continues to the next
    /// candidate.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Store` when the snapshot read or a swap call
    /// fails at the store boundary.
    pub fn withdraw(&self, request: WithdrawRequest) -> StockResult<WithdrawOutcome> {
        self.store.ensure_table()?;
        let rows = self.store.read_all()?;

        let claimed_at = Utc::now();
        let marker = StockNote::taken(claimed_at, self.config.operator.clone()).to_cell_text();
        let needle = request.keyword.as_deref().map(str::to_lowercase);
        let target = request.quantity as usize;

        let mut payloads = Vec::new();
        // Skip the header row; sheet row numbers are one-based.
        for (index, raw) in rows.iter().enumerate().skip(1) {
            if payloads.len() >= target {
                break;
            }

            let cells = schema::normalized(raw);
            let Some(candidate) = Record::from_cells(&cells) else {
                continue;
            };
            if !candidate.stock_note.is_available() {
                continue;
            }
            if !keyword_matches(needle.as_deref(), &candidate) {
                continue;
            }

            let addr = CellAddr::new((index + 1) as u32, Column::StockNote);
            let stored = schema::cell(&cells, Column::StockNote);
            match self.store.compare_and_swap(addr, stored, &marker)? {
                CasOutcome::Applied => payloads.push(candidate.raw_payload),
                CasOutcome::Mismatch { actual } => {
                    tracing::debug!(
                        cell = %addr,
                        actual = %actual,
                        "lost claim race, skipping row"
                    );
                }
            }
        }

        if payloads.is_empty() {
            return Ok(WithdrawOutcome::Exhausted);
        }

        Ok(WithdrawOutcome::Fulfilled(WithdrawReceipt {
            claim_id: ClaimId::new(),
            claimed_at,
            operator: self.config.operator.clone(),
            keyword: request.keyword,
            payloads,
        }))
    }

    /// Refreshes the derived metric columns of every qualifying data row.
    ///
    /// Each row is probed and written independently; a probe or write
    /// failure is logged and skipped so one bad row never aborts the sweep.
    /// The metric columns are disjoint from the stock-note column, so the
    /// sweep is safe to run concurrently with withdrawals.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Store` only when the initial snapshot read
    /// fails; per-row failures end up in [`SweepReport::skipped`].
    pub fn refresh_statuses(&self) -> StockResult<SweepReport> {
        self.store.ensure_table()?;
        let rows = self.store.read_all()?;

        let mut report = SweepReport::default();
        for (index, raw) in rows.iter().enumerate().skip(1) {
            let cells = schema::normalized(raw);
            if !record::is_data_row(&cells) {
                continue;
            }
            if schema::cell(&cells, Column::LifecycleStatus) != self.config.qualifying_status {
                continue;
            }
            report.scanned += 1;

            let identifier = schema::cell(&cells, Column::Identifier);
            let row_number = (index + 1) as u32;

            let metrics = match self.probe.measure(identifier) {
                Ok(metrics) => metrics,
                Err(err) => {
                    tracing::warn!(
                        row = row_number,
                        identifier,
                        error = %err,
                        "probe failed, row skipped"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            let updates = [
                CellUpdate::new(
                    CellAddr::new(row_number, Column::FollowerMetric),
                    metrics.follower_count.to_string(),
                ),
                CellUpdate::new(
                    CellAddr::new(row_number, Column::VideoMetric),
                    metrics.video_state,
                ),
            ];
            if let Err(err) = self.store.update_cells(&updates) {
                tracing::warn!(
                    row = row_number,
                    identifier,
                    error = %err,
                    "metric write failed, row skipped"
                );
                report.skipped += 1;
                continue;
            }
            report.updated += 1;
        }

        Ok(report)
    }

    /// Counts data rows by availability.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Store` when the snapshot read fails.
    pub fn counts(&self) -> StockResult<StockCounts> {
        self.store.ensure_table()?;
        let rows = self.store.read_all()?;

        let mut counts = StockCounts::default();
        for raw in rows.iter().skip(1) {
            let cells = schema::normalized(raw);
            if !record::is_data_row(&cells) {
                continue;
            }
            counts.total += 1;
            match StockNote::parse(schema::cell(&cells, Column::StockNote)) {
                Some(StockNote::Available) => counts.available += 1,
                Some(StockNote::Taken { .. }) => counts.taken += 1,
                None => {}
            }
        }
        Ok(counts)
    }
}

/// Keyword eligibility: the lowercased needle must appear in the batch
/// label, the merged info, or the raw payload. No needle matches all.
fn keyword_matches(needle: Option<&str>, record: &Record) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    record.batch_label.to_lowercase().contains(needle)
        || record.composite_info.to_lowercase().contains(needle)
        || record.raw_payload.to_lowercase().contains(needle)
}
