//! Property-based tests for the pricing core.
//!
//! These tests verify invariants hold under random inputs.

use lmsr_core::*;
use proptest::prelude::*;

// Strategies for generating test data

fn mode_strategy() -> impl Strategy<Value = ImpactMode> {
    prop_oneof![Just(ImpactMode::Linear), Just(ImpactMode::Quadratic)]
}

// raw positive weights, later floored into initial prices summing to TOTAL_PRICE
fn weight_vec_strategy() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..10_000, 1..=8)
}

fn shares_vec_strategy() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0u64..5_000, 1..=8)
}

/// Initial prices proportional to `weights`, adjusted so the sum is exactly
/// TOTAL_PRICE (creation invariant).
fn initial_prices(weights: &[u32]) -> Vec<Amount> {
    let total_weight: u128 = weights.iter().map(|&w| w as u128).sum();
    let mut prices: Vec<u128> = weights
        .iter()
        .map(|&w| w as u128 * TOTAL_PRICE / total_weight)
        .collect();
    let assigned: u128 = prices.iter().sum();
    prices[0] += TOTAL_PRICE - assigned;
    prices.into_iter().map(Amount::new).collect()
}

fn market_with(weights: &[u32], shares: &[u64], mode: ImpactMode) -> Vec<Outcome> {
    initial_prices(weights)
        .into_iter()
        .zip(weights.iter())
        .enumerate()
        .map(|(i, (price, _))| {
            let mut outcome = Outcome::new(format!("outcome-{i}"), price);
            outcome.shares = shares[i % shares.len()];
            outcome
        })
        .collect()
}

proptest! {
    /// impact is monotonic non-decreasing in the share count.
    #[test]
    fn impact_monotonic(
        n in 0u64..1_000_000,
        mode in mode_strategy(),
    ) {
        let at_n = pricing::impact(n, mode).unwrap();
        let at_next = pricing::impact(n + 1, mode).unwrap();
        prop_assert!(at_next >= at_n, "impact({}) = {} > impact({}) = {}", n, at_n, n + 1, at_next);
    }

    /// impact anchors: zero at zero shares, BASE_IMPACT_FACTOR at one.
    #[test]
    fn impact_anchors(mode in mode_strategy()) {
        prop_assert_eq!(pricing::impact(0, mode).unwrap(), 0);
        prop_assert_eq!(pricing::impact(1, mode).unwrap(), BASE_IMPACT_FACTOR);
    }

    /// Normalized prices sum to TOTAL_PRICE up to `outcomes - 1` units of
    /// truncation, at any share state.
    #[test]
    fn price_sum_bounded(
        weights in weight_vec_strategy(),
        shares in shares_vec_strategy(),
        mode in mode_strategy(),
    ) {
        let outcomes = market_with(&weights, &shares, mode);
        let prices = pricing::normalized_prices(&outcomes, mode).unwrap();
        let sum: u128 = prices.iter().sum();
        let slack = outcomes.len() as u128 - 1;
        prop_assert!(sum <= TOTAL_PRICE, "sum {} above total", sum);
        prop_assert!(sum >= TOTAL_PRICE - slack, "sum {} below bound {}", sum, TOTAL_PRICE - slack);
    }

    /// With no shares outstanding, the normalized prices are exactly the
    /// initial prices: the creation-time price-sum invariant.
    #[test]
    fn fresh_market_prices_exact(
        weights in weight_vec_strategy(),
        mode in mode_strategy(),
    ) {
        let zeros = vec![0u64; weights.len()];
        let outcomes = market_with(&weights, &zeros, mode);
        let prices = pricing::normalized_prices(&outcomes, mode).unwrap();
        for (outcome, price) in outcomes.iter().zip(&prices) {
            prop_assert_eq!(outcome.initial_price.value(), *price);
        }
        let sum: u128 = prices.iter().sum();
        prop_assert_eq!(sum, TOTAL_PRICE);
    }

    /// quote_buy of q units equals the sum of q successive unit quotes.
    #[test]
    fn multi_unit_buy_is_iterated_unit_buys(
        weights in weight_vec_strategy(),
        shares in shares_vec_strategy(),
        mode in mode_strategy(),
        qty in 1u64..20,
    ) {
        let outcomes = market_with(&weights, &shares, mode);
        let target = OutcomeId(0);

        let mut rolling = outcomes.clone();
        let mut expected: u128 = 0;
        for _ in 0..qty {
            let unit = pricing::quote_buy(&rolling, target, 1, mode).unwrap();
            expected += unit.value();
            rolling[0].shares += 1;
        }

        let quoted = pricing::quote_buy(&outcomes, target, qty, mode).unwrap();
        prop_assert_eq!(quoted.value(), expected);
    }

    /// Buying q shares then immediately selling q with no intervening trades
    /// returns exactly the buy cost (no fee at the pricing layer).
    #[test]
    fn buy_sell_round_trip_exact(
        weights in weight_vec_strategy(),
        shares in shares_vec_strategy(),
        mode in mode_strategy(),
        qty in 1u64..20,
    ) {
        let outcomes = market_with(&weights, &shares, mode);
        let target = OutcomeId(0);

        let cost = pricing::quote_buy(&outcomes, target, qty, mode).unwrap();
        let mut post = outcomes.clone();
        post[0].shares += qty;
        let back = pricing::quote_sell(&post, target, qty, mode).unwrap();

        prop_assert_eq!(cost, back);
    }

    /// Buying one outcome never lowers its own price and never raises any
    /// other outcome's price.
    #[test]
    fn buys_move_prices_the_right_way(
        weights in weight_vec_strategy(),
        shares in shares_vec_strategy(),
        mode in mode_strategy(),
        qty in 1u64..100,
    ) {
        let outcomes = market_with(&weights, &shares, mode);
        let before = pricing::normalized_prices(&outcomes, mode).unwrap();

        let mut post = outcomes.clone();
        post[0].shares += qty;
        let after = pricing::normalized_prices(&post, mode).unwrap();

        prop_assert!(after[0] >= before[0]);
        for i in 1..before.len() {
            prop_assert!(after[i] <= before[i], "outcome {} price rose on someone else's buy", i);
        }
    }
}
