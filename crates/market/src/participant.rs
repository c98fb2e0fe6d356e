use std::collections::VecDeque;
use std::sync::Arc;

use agora_core::{ParticipantId, Role, Timestamp, TradeRecord};
use agora_ports::ValuationCurve;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::book::OfferList;

/// One member of a market: a buyer, a seller, or the admin
///
/// Traders carry a valuation curve and a backlog clock (`time_needed`):
/// each settled trade adds one unit's production/consumption time, and
/// decay ticks work it off against the wall clock. Admins carry
/// neither; they only steer market parameters.
pub struct Participant {
    pub id: ParticipantId,
    pub role: Role,
    pub balance: Decimal,
    pub offers: OfferList,
    /// Seconds of production/consumption backlog still to work off
    pub time_needed: Decimal,
    /// Current private per-unit valuation (utility or cost)
    pub valuation: Decimal,
    curve: Option<Arc<dyn ValuationCurve>>,
    /// Private trading history, most recent first
    pub history: VecDeque<TradeRecord>,
    /// Pending messages (trade confirmations, market news)
    pub notifications: Vec<String>,
    /// Participant-visible error, cleared at the start of their next event
    pub error: Option<String>,
    /// Wall-clock time of the last decay tick
    pub last_tick: Timestamp,
}

impl Participant {
    pub fn buyer(curve: Arc<dyn ValuationCurve>, now: Timestamp) -> Self {
        Self::trader(Role::Buyer, OfferList::bids(), curve, now)
    }

    pub fn seller(curve: Arc<dyn ValuationCurve>, now: Timestamp) -> Self {
        Self::trader(Role::Seller, OfferList::asks(), curve, now)
    }

    pub fn admin(now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Admin,
            balance: Decimal::ZERO,
            offers: OfferList::bids(),
            time_needed: Decimal::ZERO,
            valuation: Decimal::ZERO,
            curve: None,
            history: VecDeque::new(),
            notifications: Vec::new(),
            error: None,
            last_tick: now,
        }
    }

    fn trader(
        role: Role,
        offers: OfferList,
        curve: Arc<dyn ValuationCurve>,
        now: Timestamp,
    ) -> Self {
        let valuation = curve.value_at(Decimal::ZERO);
        Self {
            id: Uuid::new_v4(),
            role,
            balance: Decimal::ZERO,
            offers,
            time_needed: Decimal::ZERO,
            valuation,
            curve: Some(curve),
            history: VecDeque::new(),
            notifications: Vec::new(),
            error: None,
            last_tick: now,
        }
    }

    pub fn is_buyer(&self) -> bool {
        self.role == Role::Buyer
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }

    /// Recompute the current valuation from the backlog clock
    pub fn revalue(&mut self) {
        if let Some(curve) = &self.curve {
            self.valuation = curve.value_at(self.time_needed);
        }
    }

    /// Work off backlog against the wall clock since the last tick
    ///
    /// The backlog floors at zero and is kept in whole seconds.
    pub fn apply_time_decay(&mut self, now: Timestamp) {
        let elapsed =
            Decimal::from((now - self.last_tick).num_milliseconds()) / Decimal::from(1000);
        self.time_needed = (self.time_needed - elapsed).max(Decimal::ZERO).round_dp(0);
        self.last_tick = now;
        self.revalue();
    }

    /// Add one unit's production/consumption time after a settled trade
    pub fn add_production_time(&mut self, time_per_unit: Decimal) {
        self.time_needed += time_per_unit;
        self.revalue();
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(message.into());
    }
}
