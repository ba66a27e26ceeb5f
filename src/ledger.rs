//! Per-user share holdings and the recovery-volume counter.
//!
//! Holdings are created lazily on first buy and never deleted; the terminal
//! `claimed` flag is what prevents a second settlement payout. The volume
//! counter tracks net amount paid into still-open positions and exists only
//! for the recovery escape hatch.

use crate::types::{Amount, MarketId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user's position in one market, indexed like `Market::outcomes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserShares {
    pub shares: Vec<u64>,
    /// Set once by settlement, never cleared.
    pub claimed: bool,
}

impl UserShares {
    pub fn new(outcome_count: usize) -> Self {
        Self {
            shares: vec![0; outcome_count],
            claimed: false,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct AccountingLedger {
    holdings: HashMap<(UserId, MarketId), UserShares>,
    volume: HashMap<UserId, Amount>,
}

impl AccountingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: UserId, market: MarketId) -> Option<&UserShares> {
        self.holdings.get(&(user, market))
    }

    pub fn get_mut(&mut self, user: UserId, market: MarketId) -> Option<&mut UserShares> {
        self.holdings.get_mut(&(user, market))
    }

    /// Zero-filled holdings record, created on first touch.
    pub fn get_or_create(
        &mut self,
        user: UserId,
        market: MarketId,
        outcome_count: usize,
    ) -> &mut UserShares {
        self.holdings
            .entry((user, market))
            .or_insert_with(|| UserShares::new(outcome_count))
    }

    pub fn user_volume(&self, user: UserId) -> Amount {
        self.volume.get(&user).copied().unwrap_or(Amount::ZERO)
    }

    /// Overwrite the counter. the engine computes the new value with checked
    /// arithmetic before committing, so this never needs to fail.
    pub fn set_volume(&mut self, user: UserId, volume: Amount) {
        self.volume.insert(user, volume);
    }

    /// Drain the whole counter. used only by the recovery escape hatch.
    pub fn take_volume(&mut self, user: UserId) -> Amount {
        self.volume.remove(&user).unwrap_or(Amount::ZERO)
    }

    /// Sum of one outcome's shares across all users of a market. the
    /// conservation invariant says this always equals the outcome's own count.
    pub fn total_user_shares(&self, market: MarketId, outcome_index: usize) -> u64 {
        self.holdings
            .iter()
            .filter(|((_, m), _)| *m == market)
            .map(|(_, us)| us.shares.get(outcome_index).copied().unwrap_or(0))
            .sum()
    }
}
