//! Property-based tests for the valuation engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{apply_movement, round_unit_price};
use super::types::{MovementKind, ProductState};

/// Strategy for movement quantities: 0.001 to 1000.000, 3 decimal places.
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

/// Strategy for unit prices: 0.01 to 10,000.00, 2 decimal places.
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a short sequence of inbound movements.
fn inbound_sequence_strategy() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((quantity_strategy(), price_strategy()), 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any sequence of inbound movements into an empty product, the
    /// stock value equals the exact sum of each movement's quantity times
    /// price, regardless of how unit prices were rounded for display.
    #[test]
    fn prop_inbound_value_is_exact_sum(movements in inbound_sequence_strategy()) {
        let mut state = ProductState::empty();
        let mut expected_value = Decimal::ZERO;

        for (quantity, price) in &movements {
            let applied = apply_movement(&state, MovementKind::In, *quantity, Some(*price))
                .expect("inbound with positive price must succeed");
            expected_value += *quantity * *price;
            state = applied.state_after();
        }

        // The exact sum, however many movements and however the display
        // price was rounded along the way.
        prop_assert_eq!(state.stock_value, expected_value);
    }

    /// The stored unit price is always reconstructible from the exact stock
    /// value: round2(value / stock) == round2(unit_price).
    #[test]
    fn prop_unit_price_reconstructible(movements in inbound_sequence_strategy()) {
        let mut state = ProductState::empty();

        for (quantity, price) in movements {
            state = apply_movement(&state, MovementKind::In, quantity, Some(price))
                .expect("inbound with positive price must succeed")
                .state_after();

            let recomputed = round_unit_price(state.stock_value / state.stock);
            prop_assert_eq!(recomputed, round_unit_price(state.unit_price));
        }
    }

    /// Outbound movements never change the weighted-average unit price, and
    /// they reduce the stock value by exactly quantity * unit_price.
    #[test]
    fn prop_outbound_preserves_price_and_exact_value(
        in_quantity in quantity_strategy(),
        price in price_strategy(),
        fraction in 1u32..=100u32,
    ) {
        let state = apply_movement(
            &ProductState::empty(),
            MovementKind::In,
            in_quantity,
            Some(price),
        )
        .unwrap()
        .state_after();

        // Issue some fraction of the on-hand stock, at least the minimum.
        let out_quantity = (state.stock * Decimal::from(fraction) / Decimal::from(100u32))
            .round_dp(3)
            .max(Decimal::new(1, 3))
            .min(state.stock);

        let applied = apply_movement(&state, MovementKind::Out, out_quantity, None).unwrap();

        prop_assert_eq!(applied.unit_price_after, state.unit_price);
        prop_assert_eq!(applied.movement_unit_price, state.unit_price);
        prop_assert_eq!(
            applied.stock_value_after,
            state.stock_value - out_quantity * state.unit_price
        );
        prop_assert_eq!(applied.stock_after, state.stock - out_quantity);
    }

    /// A caller-supplied price on an outbound movement is ignored.
    #[test]
    fn prop_outbound_ignores_supplied_price(
        price in price_strategy(),
        bogus_price in price_strategy(),
    ) {
        let state = apply_movement(
            &ProductState::empty(),
            MovementKind::In,
            Decimal::from(10u32),
            Some(price),
        )
        .unwrap()
        .state_after();

        let with_price =
            apply_movement(&state, MovementKind::Out, Decimal::ONE, Some(bogus_price)).unwrap();
        let without_price =
            apply_movement(&state, MovementKind::Out, Decimal::ONE, None).unwrap();

        prop_assert_eq!(with_price, without_price);
    }

    /// Draining all stock brings the quantity to zero and leaves only the
    /// residue of display rounding in the value.
    #[test]
    fn prop_full_drain_leaves_rounding_residue_only(
        quantity in quantity_strategy(),
        price in price_strategy(),
    ) {
        let state = apply_movement(
            &ProductState::empty(),
            MovementKind::In,
            quantity,
            Some(price),
        )
        .unwrap()
        .state_after();

        let applied = apply_movement(&state, MovementKind::Out, state.stock, None).unwrap();

        prop_assert_eq!(applied.stock_after, Decimal::ZERO);
        // Single inbound: price was never rounded, so the drain is exact.
        prop_assert_eq!(applied.stock_value_after, Decimal::ZERO);
    }
}
