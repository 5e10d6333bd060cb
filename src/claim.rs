//! Claim identity and withdrawal receipts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of one fulfilled withdrawal.
///
/// Minted when the first row of a withdrawal is claimed; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(Uuid);

impl ClaimId {
    /// Creates a new random claim ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a claim ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result of a fulfilled withdrawal.
///
/// Payloads are the original `raw_payload` values of the granted rows, in
/// table order — the record of what was handed out, sufficient on its own
/// to reconstruct the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// Identifier of this claim.
    pub claim_id: ClaimId,
    /// When the claim markers were written.
    pub claimed_at: DateTime<Utc>,
    /// Operator the rows were granted to, when the engine knows one.
    pub operator: Option<String>,
    /// Keyword filter the withdrawal ran with, if any.
    pub keyword: Option<String>,
    /// Raw payloads of the granted rows, in table (FIFO) order.
    pub payloads: Vec<String>,
}

impl WithdrawReceipt {
    /// Number of rows granted.
    #[must_use]
    pub fn granted(&self) -> usize {
        self.payloads.len()
    }

    /// Renders the export body: payloads joined by newlines.
    #[must_use]
    pub fn export_text(&self) -> String {
        self.payloads.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_ids_are_unique() {
        assert_ne!(ClaimId::new(), ClaimId::new());
    }

    #[test]
    fn test_claim_id_display_matches_uuid() {
        let id = ClaimId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_export_text_preserves_order() {
        let receipt = WithdrawReceipt {
            claim_id: ClaimId::new(),
            claimed_at: Utc::now(),
            operator: None,
            keyword: None,
            payloads: vec!["u1|p1".to_string(), "u2|p2".to_string()],
        };
        assert_eq!(receipt.granted(), 2);
        assert_eq!(receipt.export_text(), "u1|p1\nu2|p2");
    }
}
