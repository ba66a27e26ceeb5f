//! Read-only surface: quotes and state snapshots.

use super::core::Engine;
use super::results::EngineError;
use crate::ledger::UserShares;
use crate::market::{Market, MarketStatus};
use crate::pricing;
use crate::types::{Amount, ImpactMode, MarketId, OutcomeId, UserId};
use serde::{Deserialize, Serialize};

/// Snapshot of one outcome for external readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeInfo {
    pub name: String,
    pub price: Amount,
    pub shares: u64,
}

/// Snapshot of one market for external readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInfo {
    pub id: MarketId,
    pub outcomes: Vec<OutcomeInfo>,
    pub impact_mode: ImpactMode,
    pub status: MarketStatus,
    pub winning_outcome: Option<OutcomeId>,
    pub prize_pool: Amount,
}

impl MarketInfo {
    fn from_market(market: &Market) -> Self {
        Self {
            id: market.id,
            outcomes: market
                .outcomes
                .iter()
                .map(|o| OutcomeInfo {
                    name: o.name.clone(),
                    price: o.price,
                    shares: o.shares,
                })
                .collect(),
            impact_mode: market.impact_mode,
            status: market.status,
            winning_outcome: market.winning_outcome,
            prize_pool: market.prize_pool,
        }
    }
}

impl Engine {
    /// Cost of buying `quantity` shares at current state. Read-only: quotes
    /// recompute from share counts and never trust the cached price field,
    /// and they do not check trade preconditions beyond existence.
    pub fn quote_buy(
        &self,
        market_id: MarketId,
        outcome_id: OutcomeId,
        quantity: u64,
    ) -> Result<Amount, EngineError> {
        let market = self.quote_target(market_id, outcome_id, quantity)?;
        Ok(pricing::quote_buy(
            &market.outcomes,
            outcome_id,
            quantity,
            market.impact_mode,
        )?)
    }

    /// Return for selling `quantity` shares at current state, before any
    /// exit fee.
    pub fn quote_sell(
        &self,
        market_id: MarketId,
        outcome_id: OutcomeId,
        quantity: u64,
    ) -> Result<Amount, EngineError> {
        let market = self.quote_target(market_id, outcome_id, quantity)?;
        Ok(pricing::quote_sell(
            &market.outcomes,
            outcome_id,
            quantity,
            market.impact_mode,
        )?)
    }

    pub fn get_market_info(&self, market_id: MarketId) -> Result<MarketInfo, EngineError> {
        self.store
            .get(market_id)
            .map(MarketInfo::from_market)
            .ok_or(EngineError::MarketNotFound(market_id))
    }

    /// Winning outcome of a resolved market; `NotResolved` before resolution.
    pub fn get_market_winner(&self, market_id: MarketId) -> Result<OutcomeId, EngineError> {
        let market = self
            .store
            .get(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        market
            .winning_outcome
            .ok_or(EngineError::NotResolved(market_id))
    }

    /// A user's holdings in one market. A user who never traded it gets a
    /// zero-filled, unclaimed record.
    pub fn get_user_shares(
        &self,
        user: UserId,
        market_id: MarketId,
    ) -> Result<UserShares, EngineError> {
        let market = self
            .store
            .get(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        Ok(self
            .ledger
            .get(user, market_id)
            .cloned()
            .unwrap_or_else(|| UserShares::new(market.outcome_count())))
    }

    /// Recorded net volume available to the recovery escape hatch.
    pub fn user_volume(&self, user: UserId) -> Amount {
        self.ledger.user_volume(user)
    }

    /// Sum of one outcome's holdings across all users. equals the outcome's
    /// own share count whenever the conservation invariant holds; exposed so
    /// tests and auditors can check it.
    pub fn total_user_shares(&self, market_id: MarketId, outcome_id: OutcomeId) -> u64 {
        self.ledger.total_user_shares(market_id, outcome_id.index())
    }

    fn quote_target(
        &self,
        market_id: MarketId,
        outcome_id: OutcomeId,
        quantity: u64,
    ) -> Result<&Market, EngineError> {
        let market = self
            .store
            .get(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        if !market.has_outcome(outcome_id) {
            return Err(EngineError::UnknownOutcome {
                market: market_id,
                outcome: outcome_id,
            });
        }
        if quantity == 0 {
            return Err(EngineError::ZeroQuantity);
        }
        Ok(market)
    }
}
