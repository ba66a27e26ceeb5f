//! Engine configuration options.

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of events to retain in memory.
    pub max_events: usize,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Exit fee on sells, in basis points of the quoted return. the fee
    /// stays in the prize pool; pool and recovery volume move by the
    /// post-fee amount only.
    pub sell_fee_bps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_events: 100_000,
            verbose: false,
            sell_fee_bps: 0,
        }
    }
}
