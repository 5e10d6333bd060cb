//! Permissive parsing of raw ingestion text.
//!
//! One record per line, fields separated by `|`. The policy is deliberately
//! lenient: short lines are right-padded with empty fields rather than
//! rejected, so garbage rows land in the table where operators can fix them
//! in place instead of disappearing.

use crate::record::{Record, StockNote, LIFECYCLE_ACTIVE, LIVENESS_LIVE};

/// Minimum field count a parsed line is padded to.
pub const MIN_FIELDS: usize = 6;

/// One non-blank ingestion line, split and padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    fields: Vec<String>,
}

impl ParsedLine {
    /// Parses a single line. Returns `None` for blank lines.
    ///
    /// The line is trimmed, split on `|`, and right-padded to
    /// [`MIN_FIELDS`]; fields beyond the sixth are kept.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let mut fields: Vec<String> = line.split('|').map(ToString::to_string).collect();
        if fields.len() < MIN_FIELDS {
            fields.resize(MIN_FIELDS, String::new());
        }
        Some(Self { fields })
    }

    /// All fields, padded to at least [`MIN_FIELDS`].
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field 0: the record identifier (may be empty on malformed input).
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.fields[0]
    }

    /// Field 1: the record secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.fields[1]
    }

    /// Fields 2..5 rejoined with `|` — the merged-info column value.
    #[must_use]
    pub fn composite_info(&self) -> String {
        self.fields[2..MIN_FIELDS].join("|")
    }

    /// Every split field rejoined with `|` — the authoritative payload.
    ///
    /// Fields beyond the sixth are preserved here even though they never
    /// enter the merged-info column.
    #[must_use]
    pub fn raw_payload(&self) -> String {
        self.fields.join("|")
    }

    /// Builds the record this line ingests to, tagged with its batch label.
    #[must_use]
    pub fn into_record(self, batch_label: &str) -> Record {
        Record {
            batch_label: batch_label.to_string(),
            identifier: self.identifier().to_string(),
            secret: self.secret().to_string(),
            composite_info: self.composite_info(),
            follower_metric: String::new(),
            video_metric: String::new(),
            lifecycle_status: LIFECYCLE_ACTIVE.to_string(),
            assignee: String::new(),
            liveness_status: LIVENESS_LIVE.to_string(),
            raw_payload: self.raw_payload(),
            stock_note: StockNote::Available,
        }
    }
}

/// Parses a newline-separated block, dropping blank lines.
#[must_use]
pub fn parse_block(text: &str) -> Vec<ParsedLine> {
    text.lines().filter_map(ParsedLine::parse).collect()
}
