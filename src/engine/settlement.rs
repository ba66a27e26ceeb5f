//! Settlement and the emergency/recovery escape hatches.

use super::core::Engine;
use super::results::EngineError;
use crate::events::{
    EmergencyDeclaredEvent, EventPayload, FundsRecoveredEvent, RewardClaimedEvent,
};
use crate::types::{Amount, MarketId, UserId};

impl Engine {
    /// Pay out the caller's share of a resolved market's prize pool.
    ///
    /// `reward_per_share = floor(prize_pool / total_winning_shares)`, paid per
    /// winning share held. A market where nobody holds the winning outcome
    /// fails with `NoWinners`; the zero divisor is never reached. Dust from
    /// the floor division stays in escrow permanently. The claimed flag is
    /// written only after the transfer succeeds, so a failed payout leaves
    /// the claim open.
    pub fn withdraw(&mut self, caller: UserId, market_id: MarketId) -> Result<Amount, EngineError> {
        let market = self
            .store
            .get(market_id)
            .ok_or(EngineError::MarketNotFound(market_id))?;
        let winning = market
            .winning_outcome
            .ok_or(EngineError::NotResolved(market_id))?;

        let user_shares = self
            .ledger
            .get(caller, market_id)
            .ok_or(EngineError::NoPosition(market_id))?;
        if user_shares.claimed {
            return Err(EngineError::AlreadyClaimed(market_id));
        }
        let held = user_shares.shares.get(winning.index()).copied().unwrap_or(0);

        let total_winning = market.outcomes[winning.index()].shares;
        if total_winning == 0 {
            return Err(EngineError::NoWinners(market_id));
        }

        let reward_per_share = market.prize_pool.value() / total_winning as u128;
        let payout = Amount::new(
            reward_per_share
                .checked_mul(held as u128)
                .ok_or(EngineError::Overflow)?,
        );

        self.custody.transfer_out(caller, payout)?;
        self.ledger
            .get_mut(caller, market_id)
            .ok_or(EngineError::NoPosition(market_id))?
            .claimed = true;

        self.emit_event(EventPayload::RewardClaimed(RewardClaimedEvent {
            market_id,
            user: caller,
            winning_shares: held,
            payout,
        }));

        Ok(payout)
    }

    /// Settle several markets for the caller, each independently: one
    /// market's failure does not block the others. The result vector reports
    /// each market's payout or typed failure in input order.
    pub fn withdraw_many(
        &mut self,
        caller: UserId,
        market_ids: &[MarketId],
    ) -> Vec<(MarketId, Result<Amount, EngineError>)> {
        market_ids
            .iter()
            .map(|&id| (id, self.withdraw(caller, id)))
            .collect()
    }

    /// Admin-gated pause toggle. While active, buy and sell are blocked;
    /// withdraw, resolve and recovery stay available.
    pub fn declare_emergency(&mut self, caller: UserId, active: bool) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        self.emergency = active;
        self.emit_event(EventPayload::EmergencyDeclared(EmergencyDeclaredEvent {
            active,
        }));
        Ok(())
    }

    /// Pay the caller their entire recorded volume across all markets,
    /// regardless of market, resolution or claimed state, and zero the
    /// counter.
    ///
    /// HAZARD: this path does not reconcile with `withdraw`. A user who
    /// settles a won market and then recovers (or vice versa) is paid twice
    /// for the same funds, at the expense of escrow backing other markets.
    /// Kept as designed; callers integrating real payment rails must gate
    /// one path or the other.
    pub fn recovery_user_funds(&mut self, caller: UserId) -> Result<Amount, EngineError> {
        let amount = self.ledger.user_volume(caller);
        if amount.is_zero() {
            return Err(EngineError::NothingToRecover);
        }

        self.custody.transfer_out(caller, amount)?;
        self.ledger.take_volume(caller);

        self.emit_event(EventPayload::FundsRecovered(FundsRecoveredEvent {
            user: caller,
            amount,
        }));

        Ok(amount)
    }
}
