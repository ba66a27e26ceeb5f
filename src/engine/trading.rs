//! Buy and sell. the richest invariants in the engine live here.
//!
//! Preconditions are checked in a fixed order (market exists, not resolved,
//! not paused, outcome valid, quantity positive, and for sells sufficient
//! holdings); the first failure aborts with no state change. Quotes always
//! price against the pre-trade share counts. The commit sequence is:
//! checked-compute every post-trade value including the refreshed price
//! vector, then run the custody transfer, then write state. A transfer
//! failure therefore leaves nothing to roll back.

use super::core::Engine;
use super::results::EngineError;
use crate::events::{EventPayload, TradeEvent};
use crate::market::Market;
use crate::pricing;
use crate::types::{Amount, MarketId, OutcomeId, UserId};

// exit fee denominator: sell_fee_bps out of 10_000.
const BPS_DENOMINATOR: u128 = 10_000;

impl Engine {
    /// Buy `quantity` shares of one outcome. Returns the cost paid.
    ///
    /// The cost is quoted against pre-trade counts; shares, holdings, the
    /// prize pool and the caller's recovery volume all move by the quoted
    /// amount, and every outcome's cached price is refreshed (the shared
    /// weight sum couples them).
    pub fn buy(
        &mut self,
        caller: UserId,
        market_id: MarketId,
        outcome_id: OutcomeId,
        quantity: u64,
    ) -> Result<Amount, EngineError> {
        let market = self.trade_preconditions(market_id, outcome_id, quantity)?;
        let idx = outcome_id.index();
        let outcome_count = market.outcome_count();

        let cost = pricing::quote_buy(&market.outcomes, outcome_id, quantity, market.impact_mode)?;

        // checked-compute the full post-trade state before touching anything
        let new_shares = market.outcomes[idx]
            .shares
            .checked_add(quantity)
            .ok_or(EngineError::Overflow)?;
        let new_pool = market
            .prize_pool
            .checked_add(cost)
            .ok_or(EngineError::Overflow)?;
        let new_prices = {
            let mut post = market.outcomes.clone();
            post[idx].shares = new_shares;
            pricing::normalized_prices(&post, market.impact_mode)?
        };
        let held = self
            .ledger
            .get(caller, market_id)
            .and_then(|us| us.shares.get(idx).copied())
            .unwrap_or(0);
        let new_held = held.checked_add(quantity).ok_or(EngineError::Overflow)?;
        let new_volume = self
            .ledger
            .user_volume(caller)
            .checked_add(cost)
            .ok_or(EngineError::Overflow)?;

        // inbound transfer is part of the atomic unit: it runs before any
        // mutation, so a failed payment aborts the whole trade
        self.custody.transfer_in(caller, cost)?;

        let market = self
            .store
            .get_mut(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        market.outcomes[idx].shares = new_shares;
        market.prize_pool = new_pool;
        for (outcome, price) in market.outcomes.iter_mut().zip(new_prices) {
            outcome.price = Amount::new(price);
        }
        self.ledger
            .get_or_create(caller, market_id, outcome_count)
            .shares[idx] = new_held;
        self.ledger.set_volume(caller, new_volume);

        self.emit_event(EventPayload::SharesBought(TradeEvent {
            market_id,
            outcome_id,
            user: caller,
            quantity,
            amount: cost,
            prize_pool: new_pool,
        }));

        Ok(cost)
    }

    /// Sell `quantity` shares of one outcome. Returns the amount paid out
    /// after the exit fee.
    ///
    /// The return is quoted against pre-trade counts, with each unit priced
    /// at the count after that unit is removed; an immediate buy-then-sell
    /// round trip therefore returns exactly the buy cost before the fee.
    /// The fee stays in the prize pool; pool and recovery volume move by the
    /// post-fee amount only.
    pub fn sell(
        &mut self,
        caller: UserId,
        market_id: MarketId,
        outcome_id: OutcomeId,
        quantity: u64,
    ) -> Result<Amount, EngineError> {
        let market = self.trade_preconditions(market_id, outcome_id, quantity)?;
        let idx = outcome_id.index();

        let held = self
            .ledger
            .get(caller, market_id)
            .and_then(|us| us.shares.get(idx).copied())
            .unwrap_or(0);
        if held < quantity {
            return Err(EngineError::InsufficientShares {
                requested: quantity,
                held,
            });
        }

        let gross = pricing::quote_sell(&market.outcomes, outcome_id, quantity, market.impact_mode)?;
        let fee = Amount::new(
            gross
                .value()
                .checked_mul(self.config.sell_fee_bps as u128)
                .ok_or(EngineError::Overflow)?
                / BPS_DENOMINATOR,
        );
        let net = gross.checked_sub(fee).ok_or(EngineError::Overflow)?;

        // holdings were checked against the caller, and quote_sell checked
        // against the outstanding count, so the share subtraction cannot fail;
        // the pool can (interleaved trades on other outcomes shift prices), and
        // a sell that would overdraw its market's pool fails whole
        let new_shares = market.outcomes[idx]
            .shares
            .checked_sub(quantity)
            .ok_or(EngineError::Overflow)?;
        let new_pool = market
            .prize_pool
            .checked_sub(net)
            .ok_or(EngineError::Overflow)?;
        let new_prices = {
            let mut post = market.outcomes.clone();
            post[idx].shares = new_shares;
            pricing::normalized_prices(&post, market.impact_mode)?
        };
        let new_held = held - quantity;
        let new_volume = self.ledger.user_volume(caller).saturating_sub(net);

        self.custody.transfer_out(caller, net)?;

        let market = self
            .store
            .get_mut(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        market.outcomes[idx].shares = new_shares;
        market.prize_pool = new_pool;
        for (outcome, price) in market.outcomes.iter_mut().zip(new_prices) {
            outcome.price = Amount::new(price);
        }
        self.ledger
            .get_mut(caller, market_id)
            .ok_or(EngineError::NoPosition(market_id))?
            .shares[idx] = new_held;
        self.ledger.set_volume(caller, new_volume);

        self.emit_event(EventPayload::SharesSold(TradeEvent {
            market_id,
            outcome_id,
            user: caller,
            quantity,
            amount: net,
            prize_pool: new_pool,
        }));

        Ok(net)
    }

    /// Shared precondition ladder for buy and sell, checked in contract order.
    fn trade_preconditions(
        &self,
        market_id: MarketId,
        outcome_id: OutcomeId,
        quantity: u64,
    ) -> Result<&Market, EngineError> {
        let market = self
            .store
            .get(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        if market.is_resolved() {
            return Err(EngineError::MarketResolved(market_id));
        }
        if self.emergency {
            return Err(EngineError::TradingPaused);
        }
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
