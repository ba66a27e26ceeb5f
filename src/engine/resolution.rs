//! Resolution: the admin declares a winning outcome, exactly once per market.

use super::core::Engine;
use super::results::EngineError;
use crate::events::{EventPayload, MarketResolvedEvent};
use crate::types::{MarketId, OutcomeId, UserId};
use std::collections::HashSet;

impl Engine {
    /// Mark a market resolved with a winning outcome. Admin-gated, terminal:
    /// fails on unknown market, already-resolved market, or out-of-bounds
    /// winner.
    pub fn resolve(
        &mut self,
        caller: UserId,
        market_id: MarketId,
        winning: OutcomeId,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        self.validate_resolution(market_id, winning)?;
        self.apply_resolution(market_id, winning)
    }

    /// Apply several resolutions as one atomic unit. All-or-nothing: every
    /// pair is validated against current state first (a duplicate id inside
    /// the batch counts as already resolved), and if any pair fails, no
    /// market is touched.
    pub fn batch_resolve(
        &mut self,
        caller: UserId,
        resolutions: &[(MarketId, OutcomeId)],
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;

        let mut resolved_in_batch = HashSet::new();
        for &(market_id, winning) in resolutions {
            self.validate_resolution(market_id, winning)?;
            if !resolved_in_batch.insert(market_id) {
                return Err(EngineError::MarketResolved(market_id));
            }
        }

        for &(market_id, winning) in resolutions {
            self.apply_resolution(market_id, winning)?;
        }
        Ok(())
    }

    fn validate_resolution(
        &self,
        market_id: MarketId,
        winning: OutcomeId,
    ) -> Result<(), EngineError> {
        let market = self
            .store
            .get(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        if market.is_resolved() {
            return Err(EngineError::MarketResolved(market_id));
        }
        if !market.has_outcome(winning) {
            return Err(EngineError::UnknownOutcome {
                market: market_id,
                outcome: winning,
            });
        }
        Ok(())
    }

    fn apply_resolution(
        &mut self,
        market_id: MarketId,
        winning: OutcomeId,
    ) -> Result<(), EngineError> {
        let now = self.current_time;
        let market = self
            .store
            .get_mut(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        market.mark_resolved(winning, now);
        let prize_pool = market.prize_pool;

        self.emit_event(EventPayload::MarketResolved(MarketResolvedEvent {
            market_id,
            winning_outcome: winning,
            prize_pool,
        }));
        Ok(())
    }
}
