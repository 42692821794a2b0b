//! The weighted-average-cost valuation engine.
//!
//! A single pure function maps a product's pre-movement state and one
//! movement to the post-movement state. Both the single and the bulk
//! posting paths go through [`apply_movement`], so the two can never
//! drift apart.
//!
//! Precision contract: the blended total inventory value is kept
//! unrounded and becomes the product's authoritative `stock_value`;
//! only the derived unit price is rounded to 2 decimal places. Rounding
//! the unit price must never feed back into the stored value.

use rust_decimal::{Decimal, RoundingStrategy};

use stockroom_shared::types::{MIN_QUANTITY, PRICE_SCALE};

use super::error::ValuationError;
use super::types::{AppliedMovement, MovementKind, ProductState};

/// Rounds a unit price to 2 decimal places, half-up.
#[must_use]
pub fn round_unit_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Derives a unit price from a movement's total value.
///
/// Used when the caller supplies a total purchase value instead of a
/// per-unit price. The result is deliberately unrounded; it is the
/// engine's job to round only where the precision contract allows.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidQuantity`] if `quantity` is below
/// the minimum resolution.
pub fn derive_unit_price(
    total_value: Decimal,
    quantity: Decimal,
) -> Result<Decimal, ValuationError> {
    if quantity < MIN_QUANTITY {
        return Err(ValuationError::InvalidQuantity { quantity });
    }
    Ok(total_value / quantity)
}

/// Applies one stock movement to a product's valuation state.
///
/// Inbound movements blend the supplied price into the weighted average:
///
/// - empty stock: the supplied price becomes the unit price and
///   `quantity * price` the stock value, with no intermediate rounding;
/// - otherwise: `total = stock_value + quantity * price`, the new unit
///   price is `round2(total / (stock + quantity))`, and the **unrounded**
///   total becomes the new stock value. Blending from the authoritative
///   stock value (not `stock * unit_price`) keeps the invariant that the
///   value equals the exact sum of inbound values minus outbound issues.
///   Stock carried without a value (legacy rows) falls back to
///   `stock * unit_price` as the blend base.
///
/// Outbound movements are issued at the current weighted-average price.
/// A caller-supplied price is ignored, the unit price is unchanged, and
/// the stock value drops by exactly `quantity * unit_price`.
///
/// Stock sufficiency for outbound movements is NOT checked here; the
/// posting coordinator validates it so that bulk postings can report a
/// precise per-movement error.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidQuantity`] for quantities below the
/// minimum resolution, and [`ValuationError::MissingUnitPrice`] /
/// [`ValuationError::InvalidUnitPrice`] for inbound movements without a
/// positive price.
pub fn apply_movement(
    state: &ProductState,
    kind: MovementKind,
    quantity: Decimal,
    unit_price: Option<Decimal>,
) -> Result<AppliedMovement, ValuationError> {
    if quantity < MIN_QUANTITY {
        return Err(ValuationError::InvalidQuantity { quantity });
    }

    match kind {
        MovementKind::In => {
            let price = unit_price.ok_or(ValuationError::MissingUnitPrice)?;
            if price <= Decimal::ZERO {
                return Err(ValuationError::InvalidUnitPrice(price));
            }
            Ok(apply_inbound(state, quantity, price))
        }
        MovementKind::Out => Ok(apply_outbound(state, quantity)),
    }
}

fn apply_inbound(state: &ProductState, quantity: Decimal, price: Decimal) -> AppliedMovement {
    let movement_total = quantity * price;

    let (unit_price_after, stock_value_after) = if state.stock.is_zero() {
        (price, movement_total)
    } else {
        // Stock that predates value tracking has no recorded value; fall
        // back to the displayed price for those rows only.
        let base_value = if state.stock_value.is_zero() {
            state.stock * state.unit_price
        } else {
            state.stock_value
        };
        let total_value = base_value + movement_total;
        let total_quantity = state.stock + quantity;
        // Round the displayed price only; the exact total stays authoritative.
        (round_unit_price(total_value / total_quantity), total_value)
    };

    AppliedMovement {
        stock_after: state.stock + quantity,
        unit_price_after,
        stock_value_after,
        movement_unit_price: price,
        movement_total,
    }
}

fn apply_outbound(state: &ProductState, quantity: Decimal) -> AppliedMovement {
    let movement_total = quantity * state.unit_price;

    AppliedMovement {
        stock_after: state.stock - quantity,
        // Outbound movements never alter the weighted-average cost.
        unit_price_after: state.unit_price,
        stock_value_after: state.stock_value - movement_total,
        movement_unit_price: state.unit_price,
        movement_total,
    }
}
