// result and error types for engine operations.
//
// the error taxonomy: validation (bad ids, bad quantities, bad creation
// input), authorization (non-admin on a gated call), state (resolved, paused,
// claimed, short holdings), arithmetic (overflow, no-winners division guard).
// every failure aborts the whole operation with zero partial mutation.

use crate::custody::CustodyError;
use crate::market::MarketError;
use crate::pricing::PricingError;
use crate::types::{MarketId, OutcomeId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    // validation
    #[error("market {0:?} not found")]
    MarketNotFound(MarketId),

    #[error("market {market:?} has no outcome {outcome}")]
    UnknownOutcome {
        market: MarketId,
        outcome: OutcomeId,
    },

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("market creation rejected: {0}")]
    Market(#[from] MarketError),

    // authorization
    #[error("user {0:?} is not the admin")]
    NotAdmin(UserId),

    // state
    #[error("market {0:?} is already resolved")]
    MarketResolved(MarketId),

    #[error("market {0:?} is not resolved yet")]
    NotResolved(MarketId),

    #[error("trading is paused by emergency declaration")]
    TradingPaused,

    #[error("insufficient shares: requested {requested}, held {held}")]
    InsufficientShares { requested: u64, held: u64 },

    #[error("no position in market {0:?}")]
    NoPosition(MarketId),

    #[error("reward for market {0:?} already claimed")]
    AlreadyClaimed(MarketId),

    #[error("market {0:?} resolved with no winning shares outstanding")]
    NoWinners(MarketId),

    #[error("no recorded volume to recover")]
    NothingToRecover,

    // arithmetic
    #[error("arithmetic overflow")]
    Overflow,

    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    // external payment collaborator
    #[error("payment transfer failed: {0}")]
    Custody(#[from] CustodyError),
}
