// events.rs: every state change produces an event. used for audit trails,
// state reconstruction, and notifying external systems.

use crate::types::{Amount, ImpactMode, MarketId, OutcomeId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // lifecycle
    MarketCreated(MarketCreatedEvent),
    MarketResolved(MarketResolvedEvent),

    // trades
    SharesBought(TradeEvent),
    SharesSold(TradeEvent),

    // settlement
    RewardClaimed(RewardClaimedEvent),
    FundsRecovered(FundsRecoveredEvent),

    // safety
    EmergencyDeclared(EmergencyDeclaredEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCreatedEvent {
    pub market_id: MarketId,
    pub outcome_count: usize,
    pub impact_mode: ImpactMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketResolvedEvent {
    pub market_id: MarketId,
    pub winning_outcome: OutcomeId,
    pub prize_pool: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    pub market_id: MarketId,
    pub outcome_id: OutcomeId,
    pub user: UserId,
    pub quantity: u64,
    /// Cost paid on a buy, post-fee amount returned on a sell.
    pub amount: Amount,
    pub prize_pool: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardClaimedEvent {
    pub market_id: MarketId,
    pub user: UserId,
    pub winning_shares: u64,
    pub payout: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundsRecoveredEvent {
    pub user: UserId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyDeclaredEvent {
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_round_trip() {
        let event = Event::new(
            EventId(1),
            Timestamp::from_millis(42),
            EventPayload::MarketCreated(MarketCreatedEvent {
                market_id: MarketId(1),
                outcome_count: 2,
                impact_mode: ImpactMode::Linear,
            }),
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, EventId(1));
        assert_eq!(back.timestamp, Timestamp::from_millis(42));
    }
}
