//! Precision constants for stock quantities and monetary values.
//!
//! CRITICAL: Never use floating-point for stock or money calculations.
//! Quantities carry 3 decimal places, unit prices 2. The product's total
//! stock value is deliberately kept at full precision and must never be
//! re-rounded; see `stockroom-core::valuation`.

use rust_decimal::Decimal;

/// Number of decimal places carried by stock quantities.
pub const QUANTITY_SCALE: u32 = 3;

/// Number of decimal places carried by stored unit prices.
pub const PRICE_SCALE: u32 = 2;

/// Smallest accepted movement quantity (0.001 units).
pub const MIN_QUANTITY: Decimal = Decimal::from_parts(1, 0, 0, false, QUANTITY_SCALE);
