//! Canonical table layout.
//!
//! The backing table is a dumb grid of strings: the schema — column order,
//! header captions, the worksheet name — lives here, not in the store.
//! Every reader normalizes rows to [`COLUMN_COUNT`] cells before indexing,
//! because rows coming back from a remote sheet may be short.

use serde::{Deserialize, Serialize};

/// Name of the worksheet (sub-table) the inventory lives in.
pub const WORKSHEET_NAME: &str = "STOCK_MASTER";

/// Number of canonical columns.
pub const COLUMN_COUNT: usize = 11;

/// Header captions for the frozen first row, in column order.
pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "Batch",
    "Identifier",
    "Secret",
    "Merged Info",
    "Followers (auto)",
    "Video (auto)",
    "Status",
    "Assignee",
    "Liveness",
    "Raw Payload",
    "Stock Note",
];

/// A canonical column of the inventory table.
///
/// The discriminant order is the physical column order; [`Column::index`]
/// and [`Column::letter`] derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Batch label (set on batch-header rows and on every data row).
    BatchLabel,
    /// Record identifier; non-empty exactly on data rows.
    Identifier,
    /// Record secret.
    Secret,
    /// Merged auxiliary fields, pipe-joined.
    CompositeInfo,
    /// Sweep-written follower metric.
    FollowerMetric,
    /// Sweep-written video metric.
    VideoMetric,
    /// Free-text lifecycle status.
    LifecycleStatus,
    /// Operator the record is assigned to.
    Assignee,
    /// Free-text liveness status.
    LivenessStatus,
    /// Original pipe-joined input fields; immutable once written.
    RawPayload,
    /// Availability marker; sole source of truth for the available/taken split.
    StockNote,
}

impl Column {
    /// All columns in physical order.
    pub const ALL: [Self; COLUMN_COUNT] = [
        Self::BatchLabel,
        Self::Identifier,
        Self::Secret,
        Self::CompositeInfo,
        Self::FollowerMetric,
        Self::VideoMetric,
        Self::LifecycleStatus,
        Self::Assignee,
        Self::LivenessStatus,
        Self::RawPayload,
        Self::StockNote,
    ];

    /// Zero-based index of this column.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Spreadsheet column letter (`A`..`K`).
    #[must_use]
    pub const fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Header caption for this column.
    #[must_use]
    pub const fn header(self) -> &'static str {
        COLUMN_HEADERS[self.index()]
    }
}

/// Returns the frozen header row.
#[must_use]
pub fn header_row() -> Vec<String> {
    COLUMN_HEADERS.iter().map(ToString::to_string).collect()
}

/// Returns a fully-empty spacer row.
#[must_use]
pub fn blank_row() -> Vec<String> {
    vec![String::new(); COLUMN_COUNT]
}

/// Normalizes a raw row to exactly [`COLUMN_COUNT`] cells.
///
/// Short rows are right-padded with empty strings; long rows are truncated.
/// The store is allowed to return either — normalization is the caller's job.
#[must_use]
pub fn normalized(row: &[String]) -> Vec<String> {
    let mut cells: Vec<String> = row.iter().take(COLUMN_COUNT).cloned().collect();
    cells.resize(COLUMN_COUNT, String::new());
    cells
}

/// Returns the cell value for `column`, treating missing cells as empty.
#[must_use]
pub fn cell(row: &[String], column: Column) -> &str {
    row.get(column.index()).map_or("", String::as_str)
}
