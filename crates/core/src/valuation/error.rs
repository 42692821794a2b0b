//! Valuation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while applying a movement to a product's state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// Inbound movements require a unit price (or a derivable total value).
    #[error("Unit price is required for inbound movements")]
    MissingUnitPrice,

    /// The supplied unit price must be positive.
    #[error("Unit price must be positive, got {0}")]
    InvalidUnitPrice(Decimal),

    /// The movement quantity is below the minimum resolution or non-positive.
    #[error("Quantity must be at least 0.001, got {quantity}")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: Decimal,
    },
}

impl ValuationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingUnitPrice => "MISSING_UNIT_PRICE",
            Self::InvalidUnitPrice(_) => "INVALID_UNIT_PRICE",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ValuationError::MissingUnitPrice.error_code(),
            "MISSING_UNIT_PRICE"
        );
        assert_eq!(
            ValuationError::InvalidUnitPrice(dec!(-1)).error_code(),
            "INVALID_UNIT_PRICE"
        );
        assert_eq!(
            ValuationError::InvalidQuantity {
                quantity: dec!(0)
            }
            .error_code(),
            "INVALID_QUANTITY"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValuationError::InvalidQuantity {
                quantity: dec!(0.0001)
            }
            .to_string(),
            "Quantity must be at least 0.001, got 0.0001"
        );
        assert_eq!(
            ValuationError::InvalidUnitPrice(dec!(-2.50)).to_string(),
            "Unit price must be positive, got -2.50"
        );
    }
}
