//! Withdrawal request builder.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Maximum number of records to grant; at least 1.
    pub quantity: u32,
    /// Optional case-insensitive keyword filter. `None` matches everything.
    pub keyword: Option<String>,
}

/// Builder for withdrawal requests.
///
/// # Example
/// ```rust,ignore
/// let request = WithdrawBuilder::new()
///     .quantity(15)
///     .keyword("Mexico")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct WithdrawBuilder {
    quantity: Option<u32>,
    keyword: Option<String>,
}

impl WithdrawBuilder {
    /// Creates a new builder with no fields set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of records to withdraw (required, ≥ 1).
    #[must_use]
    pub const fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the keyword filter (optional; blank means unfiltered).
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if no quantity was set and
    /// `ValidationError::ZeroQuantity` for a quantity of zero.
    pub fn build(self) -> Result<WithdrawRequest, ValidationError> {
        let quantity = self.quantity.ok_or_else(|| ValidationError::MissingField {
            field: "quantity".to_string(),
        })?;
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }

        let keyword = self
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(WithdrawRequest { quantity, keyword })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_build() {
        let request = WithdrawBuilder::new().quantity(10).build().unwrap();
        assert_eq!(request.quantity, 10);
        assert_eq!(request.keyword, None);
    }

    #[test]
    fn test_keyword_is_trimmed() {
        let request = WithdrawBuilder::new()
            .quantity(1)
            .keyword("  Mexico ")
            .build()
            .unwrap();
        assert_eq!(request.keyword.as_deref(), Some("Mexico"));
    }

    #[test]
    fn test_blank_keyword_means_unfiltered() {
        let request = WithdrawBuilder::new()
            .quantity(1)
            .keyword("   ")
            .build()
            .unwrap();
        assert_eq!(request.keyword, None);
    }

    #[test]
    fn test_missing_quantity() {
        let result = WithdrawBuilder::new().build();
        assert!(
            matches!(result, Err(ValidationError::MissingField { field }) if field == "quantity")
        );
    }

    #[test]
    fn test_zero_quantity() {
        let result = WithdrawBuilder::new().quantity(0).build();
        assert!(matches!(result, Err(ValidationError::ZeroQuantity)));
    }
}
