// lmsr-core: multi-outcome prediction market engine.
// discrete LMSR-style pricing in truncating integer arithmetic; no floats.
// all computation is deterministic with no external I/O.
//
// file map:
//   types.rs    primitives: MarketId, UserId, OutcomeId, Amount, ImpactMode
//   pricing.rs  impact function, weights, normalized prices, unit-exact quotes
//   market.rs   Outcome/Market records and the id-indexed store
//   ledger.rs   per-(user, market) holdings, claimed flags, recovery volume
//   custody.rs  mocked payment collaborator: balances, escrow, transfers
//   events.rs   state transition events for audit
//   engine/     buy/sell, resolution, settlement, queries over the stores

pub mod custody;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod market;
pub mod pricing;
pub mod types;

pub use custody::{CustodyError, CustodyLedger};
pub use engine::{Engine, EngineConfig, EngineError, MarketInfo, OutcomeInfo};
pub use events::*;
pub use ledger::{AccountingLedger, UserShares};
pub use market::{Market, MarketError, MarketStatus, MarketStore, Outcome, MAX_OUTCOMES, MIN_OUTCOMES};
pub use pricing::{PricingError, BASE_IMPACT_FACTOR, TOTAL_PRICE};
pub use types::*;
