// engine/: the trade, resolution and settlement state machine around the
// pricing core. deterministic, single-writer, no external I/O; the custody
// mock is the only collaborator.

mod config;
mod core;
mod queries;
mod resolution;
mod results;
mod settlement;
mod trading;

pub use config::EngineConfig;
pub use core::Engine;
pub use queries::{MarketInfo, OutcomeInfo};
pub use results::EngineError;
