// engine/core.rs: main engine. owns the market store, the share ledger, the
// custody mock, and the admin/emergency flags. all state lives here.
//
// every mutating operation takes &mut self, which is the concurrency model:
// a single writer and a total order over operations. atomicity is by
// construction: validate and checked-compute first, transfer second, commit
// mutations last, so a failed transfer leaves zero partial state behind.

use super::config::EngineConfig;
use super::results::EngineError;
use crate::custody::CustodyLedger;
use crate::events::{Event, EventId, EventPayload, MarketCreatedEvent};
use crate::ledger::AccountingLedger;
use crate::market::{Market, MarketStore};
use crate::types::{Amount, ImpactMode, MarketId, Timestamp, UserId};

/// Main engine struct. sole mutator of markets, holdings and prize pools.
#[derive(Debug)]
pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) admin: UserId,
    pub(super) emergency: bool,
    pub(super) store: MarketStore,
    pub(super) ledger: AccountingLedger,
    pub(super) custody: CustodyLedger,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) current_time: Timestamp,
}

impl Engine {
    pub fn new(admin: UserId, config: EngineConfig) -> Self {
        Self {
            config,
            admin,
            emergency: false,
            store: MarketStore::new(),
            ledger: AccountingLedger::new(),
            custody: CustodyLedger::new(),
            events: Vec::new(),
            next_event_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn admin(&self) -> UserId {
        self.admin
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    /// Admin-gated. validates the outcome set (count, name/price lengths,
    /// price sum) and issues the next sequential id. cached prices start at
    /// the initial prices exactly, since impact(0) = 0.
    pub fn create_market(
        &mut self,
        caller: UserId,
        names: Vec<String>,
        initial_prices: Vec<Amount>,
        impact_mode: ImpactMode,
    ) -> Result<MarketId, EngineError> {
        self.require_admin(caller)?;

        let id = self.store.next_id();
        let market = Market::new(id, names, initial_prices, impact_mode, self.current_time)?;
        let outcome_count = market.outcome_count();
        self.store.insert(market);

        self.emit_event(EventPayload::MarketCreated(MarketCreatedEvent {
            market_id: id,
            outcome_count,
            impact_mode,
        }));

        Ok(id)
    }

    /// High-water mark of issued market ids.
    pub fn market_count(&self) -> u32 {
        self.store.market_count()
    }

    /// Fund a user's transferable balance. stands in for an external deposit.
    pub fn deposit(&mut self, user: UserId, amount: Amount) -> Result<(), EngineError> {
        self.custody.deposit(user, amount)?;
        Ok(())
    }

    pub fn balance_of(&self, user: UserId) -> Amount {
        self.custody.balance_of(user)
    }

    /// Funds held in engine escrow across all prize pools, plus settlement dust.
    pub fn escrow(&self) -> Amount {
        self.custody.escrow()
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(super) fn require_admin(&self, caller: UserId) -> Result<(), EngineError> {
        if caller != self.admin {
            return Err(EngineError::NotAdmin(caller));
        }
        Ok(())
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            println!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
