// 2.0 pricing.rs: the market-making rule. pure integer math, no engine state.
//
// each outcome carries a weight = initial_price + impact(shares). displayed
// prices are the weights normalized so that all outcomes in a market sum to
// TOTAL_PRICE. buying an outcome raises its impact, which raises its weight,
// which raises its normalized price and lowers everyone else's.
//
// everything is truncating integer arithmetic: multiply before divide, floor
// on the divide, overflow is a typed error. there is no floating point and no
// closed-form shortcut anywhere in this file.

use crate::market::Outcome;
use crate::types::{Amount, ImpactMode, OutcomeId};

/// Fixed price mass per market. normalized outcome prices sum to this,
/// less at most `outcomes - 1` units of truncation loss.
pub const TOTAL_PRICE: u128 = 1_000_000;

/// Weight added by the first share bought. impact(1) == BASE_IMPACT_FACTOR
/// in both modes.
pub const BASE_IMPACT_FACTOR: u128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("arithmetic overflow in fixed-point pricing")]
    Overflow,

    #[error("outcome index {0} out of range")]
    UnknownOutcome(OutcomeId),

    #[error("quote quantity must be at least 1")]
    ZeroQuantity,

    #[error("cannot quote selling {requested} shares, only {held} outstanding")]
    SharesUnderflow { requested: u64, held: u64 },
}

/// Price-weight boost for a share count. monotonic non-decreasing:
/// impact(0) = 0, impact(1) = BASE_IMPACT_FACTOR, then a degree-1 or
/// degree-2 polynomial depending on mode.
pub fn impact(shares: u64, mode: ImpactMode) -> Result<u128, PricingError> {
    let n = shares as u128;
    let linear = BASE_IMPACT_FACTOR
        .checked_mul(n)
        .ok_or(PricingError::Overflow)?;
    match mode {
        ImpactMode::Linear => Ok(linear),
        ImpactMode::Quadratic => linear.checked_mul(n).ok_or(PricingError::Overflow),
    }
}

/// Unnormalized contribution of one outcome to the market's price mass,
/// at a hypothetical share count.
pub fn weight_at(
    initial_price: Amount,
    shares: u64,
    mode: ImpactMode,
) -> Result<u128, PricingError> {
    initial_price
        .value()
        .checked_add(impact(shares, mode)?)
        .ok_or(PricingError::Overflow)
}

/// Weight of an outcome at its current share count.
pub fn weight(outcome: &Outcome, mode: ImpactMode) -> Result<u128, PricingError> {
    weight_at(outcome.initial_price, outcome.shares, mode)
}

/// floor(weight * TOTAL_PRICE / weight_sum). multiply first so truncation
/// happens once, at the end. each outcome loses strictly less than one unit,
/// so a market's prices sum to within `outcomes - 1` of TOTAL_PRICE.
pub fn normalized_price(weight: u128, weight_sum: u128) -> Result<u128, PricingError> {
    // weight_sum >= sum(initial_price) == TOTAL_PRICE > 0 for any market that
    // passed creation validation, so the divide cannot be by zero.
    if weight_sum == 0 {
        return Err(PricingError::Overflow);
    }
    weight
        .checked_mul(TOTAL_PRICE)
        .ok_or(PricingError::Overflow)
        .map(|scaled| scaled / weight_sum)
}

/// Normalized price of `outcome_id` with its share count overridden to
/// `hypothetical_shares`, all other outcomes held at their current counts.
fn price_with_override(
    outcomes: &[Outcome],
    outcome_id: OutcomeId,
    hypothetical_shares: u64,
    mode: ImpactMode,
) -> Result<u128, PricingError> {
    let idx = outcome_id.index();
    let mut weight_sum: u128 = 0;
    let mut target_weight: u128 = 0;
    for (i, outcome) in outcomes.iter().enumerate() {
        let shares = if i == idx {
            hypothetical_shares
        } else {
            outcome.shares
        };
        let w = weight_at(outcome.initial_price, shares, mode)?;
        if i == idx {
            target_weight = w;
        }
        weight_sum = weight_sum.checked_add(w).ok_or(PricingError::Overflow)?;
    }
    normalized_price(target_weight, weight_sum)
}

/// Cost of buying `quantity` shares of one outcome, one unit at a time.
///
/// Unit k is priced at share count `current + k - 1`, i.e. before that unit
/// is added, against a hypothetical running count; the other outcomes stay
/// fixed. The per-unit sum is exact, not an interpolation: the impact
/// polynomial is not linear in general, so there is no valid two-point
/// shortcut.
pub fn quote_buy(
    outcomes: &[Outcome],
    outcome_id: OutcomeId,
    quantity: u64,
    mode: ImpactMode,
) -> Result<Amount, PricingError> {
    if quantity == 0 {
        return Err(PricingError::ZeroQuantity);
    }
    let current = outcomes
        .get(outcome_id.index())
        .ok_or(PricingError::UnknownOutcome(outcome_id))?
        .shares;

    let mut total: u128 = 0;
    for k in 0..quantity {
        let hypothetical = current.checked_add(k).ok_or(PricingError::Overflow)?;
        let unit = price_with_override(outcomes, outcome_id, hypothetical, mode)?;
        total = total.checked_add(unit).ok_or(PricingError::Overflow)?;
    }
    Ok(Amount::new(total))
}

/// Return for selling `quantity` shares of one outcome, one unit at a time.
///
/// Unit k is priced at share count `current - k`, i.e. after that unit is
/// removed. Paired with the buy rule above this makes an immediate
/// buy-then-sell of the same quantity return exactly the buy cost, before
/// any exit fee. Underflow past the outstanding share count is an error;
/// the engine separately checks the caller's own holdings.
pub fn quote_sell(
    outcomes: &[Outcome],
    outcome_id: OutcomeId,
    quantity: u64,
    mode: ImpactMode,
) -> Result<Amount, PricingError> {
    if quantity == 0 {
        return Err(PricingError::ZeroQuantity);
    }
    let current = outcomes
        .get(outcome_id.index())
        .ok_or(PricingError::UnknownOutcome(outcome_id))?
        .shares;
    if quantity > current {
        return Err(PricingError::SharesUnderflow {
            requested: quantity,
            held: current,
        });
    }

    let mut total: u128 = 0;
    for k in 1..=quantity {
        let hypothetical = current - k;
        let unit = price_with_override(outcomes, outcome_id, hypothetical, mode)?;
        total = total.checked_add(unit).ok_or(PricingError::Overflow)?;
    }
    Ok(Amount::new(total))
}

/// Recompute every outcome's normalized price from current share counts.
/// Returned vector is indexed like `outcomes`.
pub fn normalized_prices(
    outcomes: &[Outcome],
    mode: ImpactMode,
) -> Result<Vec<u128>, PricingError> {
    let mut weight_sum: u128 = 0;
    let mut weights = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let w = weight(outcome, mode)?;
        weight_sum = weight_sum.checked_add(w).ok_or(PricingError::Overflow)?;
        weights.push(w);
    }
    weights
        .into_iter()
        .map(|w| normalized_price(w, weight_sum))
        .collect()
}
