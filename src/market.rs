//! Market and outcome records, and the store that owns them.
//!
//! A market is a set of 1..=32 competing outcomes created together and fixed
//! thereafter; only share counts and cached prices move after creation. The
//! store is an arena keyed by 1-based sequential id, so `market_count` doubles
//! as the high-water mark for issued ids.

use crate::pricing::{self, PricingError, TOTAL_PRICE};
use crate::types::{Amount, ImpactMode, MarketId, OutcomeId, Timestamp};
use serde::{Deserialize, Serialize};

pub const MIN_OUTCOMES: usize = 1;
pub const MAX_OUTCOMES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("market must have between {MIN_OUTCOMES} and {MAX_OUTCOMES} outcomes, got {0}")]
    BadOutcomeCount(usize),

    #[error("got {prices} initial prices but {names} names")]
    LengthMismatch { prices: usize, names: usize },

    #[error("initial prices must sum to {TOTAL_PRICE}, got {0}")]
    BadPriceSum(u128),

    #[error("initial price sum overflows the fixed-point range")]
    PriceSumOverflow,
}

/// One competing outcome. `price` is cached and derived: it is recomputed by
/// `Market::refresh_prices` after every trade and never written directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub initial_price: Amount,
    pub shares: u64,
    pub price: Amount,
}

impl Outcome {
    pub fn new(name: String, initial_price: Amount) -> Self {
        Self {
            name,
            initial_price,
            shares: 0,
            price: initial_price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    /// Open for trading.
    Open,
    /// Terminal: winner declared, settlement available.
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    /// Creation order, immutable count and names after creation.
    pub outcomes: Vec<Outcome>,
    pub impact_mode: ImpactMode,
    pub status: MarketStatus,
    /// Set exactly once, by resolution.
    pub winning_outcome: Option<OutcomeId>,
    /// Net payments accumulated from trading, paid out at settlement.
    pub prize_pool: Amount,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl Market {
    pub fn new(
        id: MarketId,
        names: Vec<String>,
        initial_prices: Vec<Amount>,
        impact_mode: ImpactMode,
        created_at: Timestamp,
    ) -> Result<Self, MarketError> {
        if initial_prices.len() != names.len() {
            return Err(MarketError::LengthMismatch {
                prices: initial_prices.len(),
                names: names.len(),
            });
        }
        let count = names.len();
        if !(MIN_OUTCOMES..=MAX_OUTCOMES).contains(&count) {
            return Err(MarketError::BadOutcomeCount(count));
        }
        // checked: a wrapped sum must not be allowed to land on TOTAL_PRICE
        let sum = initial_prices
            .iter()
            .try_fold(0u128, |acc, price| acc.checked_add(price.value()))
            .ok_or(MarketError::PriceSumOverflow)?;
        if sum != TOTAL_PRICE {
            return Err(MarketError::BadPriceSum(sum));
        }

        let outcomes = names
            .into_iter()
            .zip(initial_prices)
            .map(|(name, price)| Outcome::new(name, price))
            .collect();

        Ok(Self {
            id,
            outcomes,
            impact_mode,
            status: MarketStatus::Open,
            winning_outcome: None,
            prize_pool: Amount::ZERO,
            created_at,
            resolved_at: None,
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.status == MarketStatus::Resolved
    }

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn has_outcome(&self, outcome_id: OutcomeId) -> bool {
        outcome_id.index() < self.outcomes.len()
    }

    /// Recompute every cached price from current share counts. every trade on
    /// any outcome moves the shared weight sum, so all prices shift together.
    pub fn refresh_prices(&mut self) -> Result<(), PricingError> {
        let prices = pricing::normalized_prices(&self.outcomes, self.impact_mode)?;
        for (outcome, price) in self.outcomes.iter_mut().zip(prices) {
            outcome.price = Amount::new(price);
        }
        Ok(())
    }

    /// Terminal transition. caller has already verified the market is open
    /// and the index is in bounds.
    pub(crate) fn mark_resolved(&mut self, winning: OutcomeId, at: Timestamp) {
        debug_assert!(!self.is_resolved());
        debug_assert!(self.has_outcome(winning));
        self.status = MarketStatus::Resolved;
        self.winning_outcome = Some(winning);
        self.resolved_at = Some(at);
    }
}

/// Arena owning every market record. ids are 1-based and sequential; a
/// market, once created, is never deleted.
#[derive(Debug, Default, Clone)]
pub struct MarketStore {
    markets: Vec<Market>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// High-water mark of issued ids.
    pub fn market_count(&self) -> u32 {
        self.markets.len() as u32
    }

    pub fn next_id(&self) -> MarketId {
        MarketId(self.market_count() + 1)
    }

    pub fn insert(&mut self, market: Market) -> MarketId {
        debug_assert_eq!(market.id, self.next_id());
        let id = market.id;
        self.markets.push(market);
        id
    }

    pub fn get(&self, id: MarketId) -> Option<&Market> {
        if id.0 == 0 {
            return None;
        }
        self.markets.get(id.0 as usize - 1)
    }

    pub fn get_mut(&mut self, id: MarketId) -> Option<&mut Market> {
        if id.0 == 0 {
            return None;
        }
        self.markets.get_mut(id.0 as usize - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("outcome-{i}")).collect()
    }

    fn even_prices(n: usize) -> Vec<Amount> {
        let each = TOTAL_PRICE / n as u128;
        let mut prices = vec![Amount::new(each); n];
        // fold the remainder into the first slot so the sum is exact
        prices[0] = Amount::new(each + TOTAL_PRICE % n as u128);
        prices
    }

    #[test]
    fn creation_validates_price_sum() {
        let err = Market::new(
            MarketId(1),
            names(2),
            vec![Amount::new(400_000), Amount::new(500_000)],
            ImpactMode::Linear,
            Timestamp::from_millis(0),
        )
        .unwrap_err();
        assert_eq!(err, MarketError::BadPriceSum(900_000));
    }

    #[test]
    fn creation_rejects_overflowing_price_sum() {
        // these two wrap around to exactly TOTAL_PRICE; the checked sum must
        // report overflow instead of letting the wrapped total pass
        let err = Market::new(
            MarketId(1),
            names(2),
            vec![Amount::new(u128::MAX), Amount::new(TOTAL_PRICE + 1)],
            ImpactMode::Linear,
            Timestamp::from_millis(0),
        )
        .unwrap_err();
        assert_eq!(err, MarketError::PriceSumOverflow);
    }

    #[test]
    fn creation_validates_outcome_count() {
        let err = Market::new(
            MarketId(1),
            names(33),
            even_prices(33),
            ImpactMode::Linear,
            Timestamp::from_millis(0),
        )
        .unwrap_err();
        assert_eq!(err, MarketError::BadOutcomeCount(33));

        let err = Market::new(
            MarketId(1),
            vec![],
            vec![],
            ImpactMode::Linear,
            Timestamp::from_millis(0),
        )
        .unwrap_err();
        assert_eq!(err, MarketError::BadOutcomeCount(0));
    }

    #[test]
    fn creation_validates_lengths() {
        let err = Market::new(
            MarketId(1),
            names(3),
            even_prices(2),
            ImpactMode::Linear,
            Timestamp::from_millis(0),
        )
        .unwrap_err();
        assert_eq!(err, MarketError::LengthMismatch { prices: 2, names: 3 });
    }

    #[test]
    fn fresh_market_prices_sum_exactly() {
        for n in [1usize, 2, 3, 7, 32] {
            let market = Market::new(
                MarketId(1),
                names(n),
                even_prices(n),
                ImpactMode::Linear,
                Timestamp::from_millis(0),
            )
            .unwrap();
            let sum: u128 = market.outcomes.iter().map(|o| o.price.value()).sum();
            assert_eq!(sum, TOTAL_PRICE, "n={n}");
        }
    }

    #[test]
    fn store_ids_are_one_based_and_sequential() {
        let mut store = MarketStore::new();
        assert_eq!(store.market_count(), 0);
        assert!(store.get(MarketId(0)).is_none());
        assert!(store.get(MarketId(1)).is_none());

        for expected in 1..=3u32 {
            let id = store.next_id();
            assert_eq!(id, MarketId(expected));
            let market = Market::new(
                id,
                names(2),
                even_prices(2),
                ImpactMode::Linear,
                Timestamp::from_millis(0),
            )
            .unwrap();
            store.insert(market);
        }
        assert_eq!(store.market_count(), 3);
        assert!(store.get(MarketId(3)).is_some());
        assert!(store.get(MarketId(4)).is_none());
    }

    #[test]
    fn refresh_updates_cached_prices() {
        let mut market = Market::new(
            MarketId(1),
            names(2),
            even_prices(2),
            ImpactMode::Linear,
            Timestamp::from_millis(0),
        )
        .unwrap();
        market.outcomes[0].shares = 10;
        market.refresh_prices().unwrap();
        assert!(market.outcomes[0].price.value() > 500_000);
        assert!(market.outcomes[1].price.value() < 500_000);
    }
}
