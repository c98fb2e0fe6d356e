use std::collections::HashMap;

use agora_core::{MarketId, MarketParameters, ParticipantId, Price, StandingOffer, TradeRecord};
use rust_decimal::Decimal;
use serde::Serialize;

/// One entry on the aggregated bid or ask list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookEntry {
    pub price: Price,
    /// Originating participant
    pub participant: ParticipantId,
}

/// One point on the public trade tape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TapePoint {
    /// Seconds since market opening
    pub seconds: i64,
    pub price: Price,
}

/// What one participant sees after an event has been processed
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    /// Effective current offer (best of the standing offers), if any
    pub current_offer: Option<StandingOffer>,
    pub balance: Decimal,
    /// All standing bids in the market, best first
    pub bids: Vec<BookEntry>,
    /// All standing asks in the market, best first
    pub asks: Vec<BookEntry>,
    /// The participant's own standing offers, best first
    pub offers: Vec<StandingOffer>,
    /// Private trading history, most recent first
    pub trading_history: Vec<TradeRecord>,
    /// Seconds of production/consumption backlog
    pub time_needed: Decimal,
    /// Current private per-unit valuation
    pub valuation: Decimal,
    /// Market parameters in force right now
    pub params: MarketParameters,
    /// Public trade tape for charting
    pub tape: Vec<TapePoint>,
    /// Market news from this event (trade announcement), if any
    pub news: Option<String>,
    /// Pending notifications, oldest first
    pub notifications: Vec<String>,
    /// Participant-visible error from this event, if any
    pub error: Option<String>,
}

/// Full per-participant state returned to the host after each event
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub market: MarketId,
    pub views: HashMap<ParticipantId, ParticipantView>,
}

impl MarketSnapshot {
    pub fn view(&self, participant: &ParticipantId) -> Option<&ParticipantView> {
        self.views.get(participant)
    }
}
