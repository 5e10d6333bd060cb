//! Plain-text export of withdrawal receipts.
//!
//! The export body is the newline-joined raw payloads of the granted rows;
//! the filename carries a timestamp and, when the withdrawal was filtered,
//! the keyword.

use std::fs;
use std::path::{Path, PathBuf};

use crate::claim::WithdrawReceipt;
use crate::error::StockResult;

const FILENAME_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Filename slug: lowercase alphanumerics, everything else collapsed to `-`.
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = true;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Returns the export filename for a receipt.
///
/// `withdrawal_{keyword|all}_{timestamp}.txt`, timestamped with the claim
/// time so re-exports of the same receipt collide instead of multiplying.
#[must_use]
pub fn receipt_filename(receipt: &WithdrawReceipt) -> String {
    let scope = receipt
        .keyword
        .as_deref()
        .map(slug)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "all".to_string());
    format!(
        "withdrawal_{scope}_{}.txt",
        receipt.claimed_at.format(FILENAME_STAMP_FORMAT)
    )
}

/// Writes the receipt's export text into `dir`, returning the file path.
///
/// # Errors
///
/// Returns `StockError::Io` if the file cannot be written.
pub fn write_receipt(dir: &Path, receipt: &WithdrawReceipt) -> StockResult<PathBuf> {
    let path = dir.join(receipt_filename(receipt));
    fs::write(&path, receipt.export_text())?;
    Ok(path)
}
