// custody.rs: MOCKED. stands in for the external fungible-payment ledger;
// just balance changes against an escrow, no real token transfers.
//
// transfer_in moves funds from a user's transferable balance into engine
// escrow, transfer_out moves them back. either can fail, and a failure must
// abort the calling engine operation with zero state change, so the engine
// always transfers before it mutates.

use crate::types::{Amount, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("escrow short: requested {requested}, held {held}")]
    EscrowShort { requested: Amount, held: Amount },

    #[error("balance overflow")]
    Overflow,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CustodyLedger {
    balances: HashMap<UserId, Amount>,
    /// Funds currently held by the engine: prize pools plus accumulated dust.
    escrow: Amount,
}

impl CustodyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, user: UserId) -> Amount {
        self.balances.get(&user).copied().unwrap_or(Amount::ZERO)
    }

    pub fn escrow(&self) -> Amount {
        self.escrow
    }

    /// Credit a user's transferable balance from outside the engine.
    pub fn deposit(&mut self, user: UserId, amount: Amount) -> Result<(), CustodyError> {
        let entry = self.balances.entry(user).or_insert(Amount::ZERO);
        *entry = entry.checked_add(amount).ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    /// User pays the engine. fails whole if the balance is short.
    pub fn transfer_in(&mut self, from: UserId, amount: Amount) -> Result<(), CustodyError> {
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientBalance {
                requested: amount,
                available,
            })?;
        let escrow = self
            .escrow
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.balances.insert(from, remaining);
        self.escrow = escrow;
        Ok(())
    }

    /// Engine pays a user. fails whole if escrow is short.
    pub fn transfer_out(&mut self, to: UserId, amount: Amount) -> Result<(), CustodyError> {
        let escrow = self
            .escrow
            .checked_sub(amount)
            .ok_or(CustodyError::EscrowShort {
                requested: amount,
                held: self.escrow,
            })?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.escrow = escrow;
        self.balances.insert(to, balance);
        Ok(())
    }
}
