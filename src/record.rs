//! Inventory records and the availability marker.
//!
//! A [`Record`] is one data row of the backing table. Its availability is
//! carried by [`StockNote`], a tagged variant that is serialized to free
//! text only at the store boundary: `"New"` for an available record,
//! `"Taken {timestamp}"` (optionally suffixed with the claiming operator)
//! once withdrawn. The stock note — not any separate flag — is the sole
//! source of truth for the available/taken partition.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{self, Column, COLUMN_COUNT};

/// Cell text marking an available record.
pub const AVAILABLE_MARKER: &str = "New";

/// Prefix of the cell text marking a taken record.
pub const TAKEN_PREFIX: &str = "Taken";

/// Lifecycle status written on ingestion.
pub const LIFECYCLE_ACTIVE: &str = "Active";

/// Liveness status written on ingestion.
pub const LIVENESS_LIVE: &str = "Live";

const TAKEN_AT_FORMAT: &str = "%Y-%m-%d %H:%M";
const HEADER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Availability state of a record.
///
/// Anything stored in the stock-note column that parses as neither variant
/// is invalid input to the withdrawal path; such rows are never eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockNote {
    /// The record has not been withdrawn.
    Available,
    /// The record was withdrawn.
    Taken {
        /// When the claim was written (minute precision at the boundary).
        at: DateTime<Utc>,
        /// Operator the record was granted to, when recorded.
        by: Option<String>,
    },
}

impl StockNote {
    /// Parses the stored cell text.
    ///
    /// Returns `None` for any text that is not exactly the available marker
    /// or a well-formed taken marker.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == AVAILABLE_MARKER {
            return Some(Self::Available);
        }

        let rest = text.strip_prefix(TAKEN_PREFIX)?.trim();
        let (stamp, by) = match rest.rfind(" (") {
            Some(pos) if rest.ends_with(')') => {
                let operator = rest[pos + 2..rest.len() - 1].trim();
                let by = if operator.is_empty() {
                    None
                } else {
                    Some(operator.to_string())
                };
                (rest[..pos].trim_end(), by)
            }
            _ => (rest, None),
        };

        let at = NaiveDateTime::parse_from_str(stamp, TAKEN_AT_FORMAT)
            .ok()?
            .and_utc();
        Some(Self::Taken { at, by })
    }

    /// Creates a taken marker claimed at `at` by the optional operator.
    #[must_use]
    pub fn taken(at: DateTime<Utc>, by: Option<String>) -> Self {
        Self::Taken { at, by }
    }

    /// Returns true if the record is still claimable.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Serializes to the cell text stored at the boundary.
    #[must_use]
    pub fn to_cell_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StockNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "{AVAILABLE_MARKER}"),
            Self::Taken { at, by } => {
                write!(f, "{TAKEN_PREFIX} {}", at.format(TAKEN_AT_FORMAT))?;
                if let Some(by) = by {
                    write!(f, " ({by})")?;
                }
                Ok(())
            }
        }
    }
}

/// One claimable credential set, as stored in a single data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Label of the batch this record was ingested with.
    pub batch_label: String,
    /// Primary identifier; non-empty on every data row.
    pub identifier: String,
    /// Credential secret.
    pub secret: String,
    /// Auxiliary input fields 2..5, pipe-joined.
    pub composite_info: String,
    /// Follower metric written by the refresh sweep; empty until swept.
    pub follower_metric: String,
    /// Video metric written by the refresh sweep; empty until swept.
    pub video_metric: String,
    /// Free-text lifecycle status (`"Active"`, `"Kicked"`, ...).
    pub lifecycle_status: String,
    /// Operator the record is assigned to; free text.
    pub assignee: String,
    /// Free-text liveness status.
    pub liveness_status: String,
    /// Original pipe-joined input line; the authoritative export source.
    pub raw_payload: String,
    /// Availability marker.
    pub stock_note: StockNote,
}

impl Record {
    /// Reads a record out of a normalized (or short) row.
    ///
    /// Returns `None` when the row is not a data row (empty identifier:
    /// spacer, batch header, malformed) or when the stock note does not
    /// parse — either way the row is invisible to record-level consumers.
    #[must_use]
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        let identifier = schema::cell(cells, Column::Identifier);
        if identifier.is_empty() {
            return None;
        }
        let stock_note = StockNote::parse(schema::cell(cells, Column::StockNote))?;

        Some(Self {
            batch_label: schema::cell(cells, Column::BatchLabel).to_string(),
            identifier: identifier.to_string(),
            secret: schema::cell(cells, Column::Secret).to_string(),
            composite_info: schema::cell(cells, Column::CompositeInfo).to_string(),
            follower_metric: schema::cell(cells, Column::FollowerMetric).to_string(),
            video_metric: schema::cell(cells, Column::VideoMetric).to_string(),
            lifecycle_status: schema::cell(cells, Column::LifecycleStatus).to_string(),
            assignee: schema::cell(cells, Column::Assignee).to_string(),
            liveness_status: schema::cell(cells, Column::LivenessStatus).to_string(),
            raw_payload: schema::cell(cells, Column::RawPayload).to_string(),
            stock_note,
        })
    }

    /// Serializes to a full-width table row in canonical column order.
    #[must_use]
    pub fn into_row(self) -> Vec<String> {
        let mut row = vec![String::new(); COLUMN_COUNT];
        row[Column::BatchLabel.index()] = self.batch_label;
        row[Column::Identifier.index()] = self.identifier;
        row[Column::Secret.index()] = self.secret;
        row[Column::CompositeInfo.index()] = self.composite_info;
        row[Column::FollowerMetric.index()] = self.follower_metric;
        row[Column::VideoMetric.index()] = self.video_metric;
        row[Column::LifecycleStatus.index()] = self.lifecycle_status;
        row[Column::Assignee.index()] = self.assignee;
        row[Column::LivenessStatus.index()] = self.liveness_status;
        row[Column::RawPayload.index()] = self.raw_payload;
        row[Column::StockNote.index()] = self.stock_note.to_cell_text();
        row
    }
}

/// Returns true if the row holds a record (non-empty identifier cell).
///
/// Spacer and batch-header rows fail this test and must be skipped by every
/// aggregate computation.
#[must_use]
pub fn is_data_row(row: &[String]) -> bool {
    !schema::cell(row, Column::Identifier).is_empty()
}

/// Builds the human-readable batch-header row.
///
/// Only the first column is set: `"📦 {label} ({date})"`. The marker exists
/// for operators skimming the raw table; no reader may rely on it as a
/// structural delimiter.
#[must_use]
pub fn batch_header_row(label: &str, on: DateTime<Utc>) -> Vec<String> {
    let mut row = schema::blank_row();
    row[Column::BatchLabel.index()] = format!("📦 {label} ({})", on.format(HEADER_DATE_FORMAT));
    row
}
