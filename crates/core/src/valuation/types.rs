//! Valuation domain types for stock movements.
//!
//! These types describe a product's valuation state before a movement
//! and the state produced by applying one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Inbound movement: stock received at a supplied unit price.
    In,
    /// Outbound movement: stock issued at the current weighted-average price.
    Out,
}

impl MovementKind {
    /// Returns true for inbound movements.
    #[must_use]
    pub fn is_inbound(&self) -> bool {
        matches!(self, Self::In)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}

/// A product's valuation state immediately before a movement.
///
/// `stock_value` is the authoritative total inventory value. It is tracked
/// exactly across movements and is NOT derivable from `stock * unit_price`
/// without reintroducing rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState {
    /// On-hand quantity (3 decimal places).
    pub stock: Decimal,
    /// Current weighted-average unit cost (rounded to 2 decimal places for display).
    pub unit_price: Decimal,
    /// Exact total inventory value (unrounded).
    pub stock_value: Decimal,
}

impl ProductState {
    /// A product with no stock and no value.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            stock: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            stock_value: Decimal::ZERO,
        }
    }
}

/// The result of applying one movement to a product's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMovement {
    /// On-hand quantity after the movement.
    pub stock_after: Decimal,
    /// Weighted-average unit price after the movement (2 decimal places).
    pub unit_price_after: Decimal,
    /// Exact total inventory value after the movement (unrounded).
    pub stock_value_after: Decimal,
    /// The unit price attributed to this movement.
    ///
    /// For inbound movements this is the supplied price; for outbound
    /// movements it is the pre-movement weighted-average price.
    pub movement_unit_price: Decimal,
    /// The movement's total value (`quantity * movement_unit_price`).
    pub movement_total: Decimal,
}

impl AppliedMovement {
    /// Returns the post-movement product state.
    #[must_use]
    pub fn state_after(&self) -> ProductState {
        ProductState {
            stock: self.stock_after,
            unit_price: self.unit_price_after,
            stock_value: self.stock_value_after,
        }
    }
}
