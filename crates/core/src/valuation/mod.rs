//! Weighted-average-cost inventory valuation.
//!
//! This module implements the core valuation logic:
//! - Domain types for product state and stock movements
//! - The valuation engine applying a movement to a product's state
//! - Error types for valuation failures
//!
//! The engine is a pure function over decimals; persistence and
//! sufficiency checks belong to the posting coordinator in `stockroom-db`.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{apply_movement, derive_unit_price, round_unit_price};
pub use error::ValuationError;
pub use types::{AppliedMovement, MovementKind, ProductState};
