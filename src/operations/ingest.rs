//! Ingestion request builder.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated bulk-ingestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Label of the batch being ingested; never empty.
    pub batch_label: String,
    /// Raw newline-separated, pipe-delimited text.
    pub raw_text: String,
}

/// Builder for ingestion requests.
///
/// # Example
/// ```rust,ignore
/// let request = IngestBuilder::new()
///     .batch_label("Mexico 27/12")
///     .raw_text("u1|p1|m1|mp1|2fa1|x1\nu2|p2")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct IngestBuilder {
    batch_label: Option<String>,
    raw_text: Option<String>,
}

impl IngestBuilder {
    /// Creates a new builder with no fields set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch label (required, non-empty).
    #[must_use]
    pub fn batch_label(mut self, label: impl Into<String>) -> Self {
        self.batch_label = Some(label.into());
        self
    }

    /// Set the raw ingestion text (required; may yield zero data rows).
    #[must_use]
    pub fn raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = Some(text.into());
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if a field was never set and
    /// `ValidationError::EmptyBatchLabel` if the label is empty or
    /// whitespace.
    pub fn build(self) -> Result<IngestRequest, ValidationError> {
        let batch_label = self
            .batch_label
            .ok_or_else(|| ValidationError::MissingField {
                field: "batch_label".to_string(),
            })?;
        let batch_label = batch_label.trim().to_string();
        if batch_label.is_empty() {
            return Err(ValidationError::EmptyBatchLabel);
        }

        let raw_text = self.raw_text.ok_or_else(|| ValidationError::MissingField {
            field: "raw_text".to_string(),
        })?;

        Ok(IngestRequest {
            batch_label,
            raw_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_build() {
        let request = IngestBuilder::new()
            .batch_label("Mexico 27/12")
            .raw_text("u1|p1")
            .build()
            .unwrap();
        assert_eq!(request.batch_label, "Mexico 27/12");
    }

    #[test]
    fn test_label_is_trimmed() {
        let request = IngestBuilder::new()
            .batch_label("  Mexico  ")
            .raw_text("")
            .build()
            .unwrap();
        assert_eq!(request.batch_label, "Mexico");
    }

    #[test]
    fn test_missing_label() {
        let result = IngestBuilder::new().raw_text("u1|p1").build();
        assert!(
            matches!(result, Err(ValidationError::MissingField { field }) if field == "batch_label")
        );
    }

    #[test]
    fn test_empty_label() {
        let result = IngestBuilder::new().batch_label("   ").raw_text("x").build();
        assert!(matches!(result, Err(ValidationError::EmptyBatchLabel)));
    }

    #[test]
    fn test_missing_raw_text() {
        let result = IngestBuilder::new().batch_label("Mexico").build();
        assert!(
            matches!(result, Err(ValidationError::MissingField { field }) if field == "raw_text")
        );
    }
}
