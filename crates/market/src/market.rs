use std::sync::Arc;

use agora_core::{
    MarketEvent, MarketId, MarketParameters, ParticipantId, Price, Role, StandingOffer, Timestamp,
    Trade,
};
use agora_ports::{Clock, ValuationCurve};
use indexmap::IndexMap;
use log::{debug, info};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::matching::{self, MatchFound};
use crate::params;
use crate::participant::Participant;
use crate::settlement;
use crate::snapshot::{BookEntry, MarketSnapshot, ParticipantView, TapePoint};

/// A single double-auction market: one group of participants, one set
/// of standing offers, one parameter record
///
/// The market is a synchronous state machine. `process_event` takes one
/// participant event, runs validation, book mutation, matching and
/// settlement to completion, and returns the per-participant state.
/// Events within one market must be serialized by the caller (see
/// [`MarketRegistry`](crate::registry::MarketRegistry)); markets share
/// nothing and may run in parallel.
pub struct Market {
    id: MarketId,
    config: MarketConfig,
    params: MarketParameters,
    /// Roster in seat order; the matching scan iterates in this order
    participants: IndexMap<ParticipantId, Participant>,
    trades: Vec<Trade>,
    opened_at: Timestamp,
    clock: Arc<dyn Clock>,
    /// Public announcement produced by the event being processed
    news: Option<String>,
}

impl Market {
    pub fn new(config: MarketConfig, clock: Arc<dyn Clock>) -> Self {
        let opened_at = clock.now();
        let params = config.initial_params.clone();
        info!(
            "market opens: \"{}\" (floor {}, ceiling {}, buyer tax {}, seller tax {})",
            config.description,
            params.price_floor,
            params.price_ceiling,
            params.buyer_tax,
            params.seller_tax
        );
        Self {
            id: Uuid::new_v4(),
            config,
            params,
            participants: IndexMap::new(),
            trades: Vec::new(),
            opened_at,
            clock,
            news: None,
        }
    }

    pub fn id(&self) -> MarketId {
        self.id
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Parameters currently in force
    pub fn params(&self) -> &MarketParameters {
        &self.params
    }

    /// Every trade concluded so far, oldest first (host export)
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Seat a buyer with the given valuation curve; returns their id
    pub fn add_buyer(&mut self, curve: Arc<dyn ValuationCurve>) -> ParticipantId {
        self.seat(Participant::buyer(curve, self.clock.now()))
    }

    /// Seat a seller with the given valuation curve; returns their id
    pub fn add_seller(&mut self, curve: Arc<dyn ValuationCurve>) -> ParticipantId {
        self.seat(Participant::seller(curve, self.clock.now()))
    }

    /// Seat the admin; returns their id
    pub fn add_admin(&mut self) -> ParticipantId {
        self.seat(Participant::admin(self.clock.now()))
    }

    fn seat(&mut self, participant: Participant) -> ParticipantId {
        let id = participant.id;
        debug!(
            "market {}: seat {} joins as {:?}",
            self.id, id, participant.role
        );
        self.participants.insert(id, participant);
        id
    }

    /// Process one participant event and return the updated state
    ///
    /// The single entry point of the engine. Soft failures (price
    /// rejections) land in the sender's `error` field on the returned
    /// snapshot; hard failures (unknown sender, non-admin intervention)
    /// are `Err` and leave all state unchanged.
    pub fn process_event(
        &mut self,
        participant_id: ParticipantId,
        event: MarketEvent,
    ) -> Result<MarketSnapshot> {
        let role = self
            .participants
            .get(&participant_id)
            .map(|p| p.role)
            .ok_or(MarketError::UnknownParticipant(participant_id))?;

        self.news = None;
        if let Some(p) = self.participants.get_mut(&participant_id) {
            p.error = None;
        }

        debug!(
            "market {}: {:?} from {} ({:?})",
            self.id, event, participant_id, role
        );

        match event {
            MarketEvent::Offer { price } => self.handle_offer(participant_id, role, price)?,
            MarketEvent::Withdrawal { price } => self.handle_withdrawal(participant_id, price)?,
            MarketEvent::TimeUpdate => self.handle_time_update(participant_id)?,
            MarketEvent::MarketUpdate {
                buyer_tax,
                seller_tax,
                price_floor,
                price_ceiling,
            } => self.handle_market_update(
                role,
                MarketParameters::new(buyer_tax, seller_tax, price_floor, price_ceiling),
            )?,
            MarketEvent::NotificationDeletion { index } => {
                self.handle_notification_deletion(participant_id, index)?
            }
        }

        Ok(self.snapshot())
    }

    fn handle_offer(&mut self, id: ParticipantId, role: Role, price: Price) -> Result<()> {
        if role == Role::Admin {
            return Err(MarketError::AdminCannotTrade);
        }

        let now = self.clock.now();
        let submitted = StandingOffer::new(price, now);
        let params = self.params.clone();
        let market_id = self.id;
        {
            let p = self.participant_mut(id)?;
            if let Err(e) = p.offers.submit(price, now, &params) {
                if e.is_rejection() {
                    info!("market {}: offer at {} from {} rejected: {}", market_id, price, id, e);
                    p.error = Some(e.to_string());
                    return Ok(());
                }
                return Err(e);
            }
        }

        // One match per event; the submitter's side is pitted against the
        // whole opposite side
        let found = match role {
            Role::Buyer => self.scan(Some(id), None),
            Role::Seller => self.scan(None, Some(id)),
            Role::Admin => None,
        };

        if let Some(m) = found {
            if let Err(e) = self.execute_trade(m) {
                if e.is_rejection() {
                    // The triggering submission is rejected: take the
                    // fresh offer back out and leave everything else as
                    // it was
                    let message = e.to_string();
                    info!("market {}: settlement refused, rolling back offer: {}", self.id, message);
                    let p = self.participant_mut(id)?;
                    p.offers.withdraw_exact(&submitted);
                    p.error = Some(message);
                    return Ok(());
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn handle_withdrawal(&mut self, id: ParticipantId, price: Price) -> Result<()> {
        {
            let p = self.participant_mut(id)?;
            if p.offers.withdraw(price).is_some() {
                debug!("market {}: {} withdrew offer at {}", self.id, id, price);
            }
        }

        // A withdrawal can expose an older crossing; rescan the whole
        // market
        if let Some(m) = self.scan(None, None) {
            if let Err(e) = self.execute_trade(m) {
                if e.is_rejection() {
                    let p = self.participant_mut(id)?;
                    p.error = Some(e.to_string());
                    return Ok(());
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn handle_time_update(&mut self, id: ParticipantId) -> Result<()> {
        let now = self.clock.now();
        let p = self.participant_mut(id)?;
        if p.role.is_trader() {
            p.apply_time_decay(now);
        }
        Ok(())
    }

    fn handle_market_update(&mut self, role: Role, replacement: MarketParameters) -> Result<()> {
        if role != Role::Admin {
            return Err(MarketError::NotAdmin);
        }

        match params::apply_update(&mut self.params, replacement)? {
            Some(intervention) => {
                info!(
                    "market {}: parameters v{} committed: {}",
                    self.id, self.params.version, intervention.broadcast
                );
                for p in self.participants.values_mut() {
                    p.notify(intervention.broadcast.clone());
                }
            }
            None => {
                debug!("market {}: intervention changed nothing, no broadcast", self.id);
            }
        }
        Ok(())
    }

    fn handle_notification_deletion(&mut self, id: ParticipantId, index: usize) -> Result<()> {
        let p = self.participant_mut(id)?;
        if index < p.notifications.len() {
            p.notifications.remove(index);
        }
        Ok(())
    }

    /// First-found scan, optionally pinned to one buyer or one seller
    fn scan(
        &self,
        buyer_only: Option<ParticipantId>,
        seller_only: Option<ParticipantId>,
    ) -> Option<MatchFound> {
        let buyers: Vec<&Participant> = self
            .participants
            .values()
            .filter(|p| p.is_buyer())
            .filter(|p| buyer_only.is_none_or(|id| p.id == id))
            .collect();
        let sellers: Vec<&Participant> = self
            .participants
            .values()
            .filter(|p| p.is_seller())
            .filter(|p| seller_only.is_none_or(|id| p.id == id))
            .collect();
        matching::find_match(&buyers, &sellers)
    }

    /// Settle a matched pair: all fallible work happens before any
    /// mutation, so the trade either applies in full or not at all
    fn execute_trade(&mut self, m: MatchFound) -> Result<()> {
        let now = self.clock.now();
        let buyer = self
            .participants
            .get(&m.buyer)
            .ok_or(MarketError::UnknownParticipant(m.buyer))?;
        let seller = self
            .participants
            .get(&m.seller)
            .ok_or(MarketError::UnknownParticipant(m.seller))?;

        let outcome = settlement::prepare(
            buyer,
            seller,
            &self.params,
            &self.config,
            now,
            self.opened_at,
        )?;

        let time_per_unit = self.config.time_per_unit;
        settlement::apply_buyer(self.participant_mut(m.buyer)?, &outcome, time_per_unit);
        settlement::apply_seller(self.participant_mut(m.seller)?, &outcome, time_per_unit);

        info!(
            "market {}: trade at {} after {}s (buyer profit {}, seller profit {})",
            self.id,
            outcome.trade.price,
            outcome.trade.seconds,
            outcome.trade.buyer_profit,
            outcome.trade.seller_profit
        );

        self.news = Some(outcome.news);
        self.trades.push(outcome.trade);
        Ok(())
    }

    /// Per-participant views of the current state
    pub fn snapshot(&self) -> MarketSnapshot {
        let (bids, asks) = self.aggregated_book();
        let tape: Vec<TapePoint> = self
            .trades
            .iter()
            .map(|t| TapePoint {
                seconds: t.seconds,
                price: t.price,
            })
            .collect();

        let views = self
            .participants
            .values()
            .map(|p| {
                (
                    p.id,
                    ParticipantView {
                        current_offer: p.offers.best().copied(),
                        balance: p.balance,
                        bids: bids.clone(),
                        asks: asks.clone(),
                        offers: p.offers.iter().copied().collect(),
                        trading_history: p.history.iter().cloned().collect(),
                        time_needed: p.time_needed,
                        valuation: p.valuation,
                        params: self.params.clone(),
                        tape: tape.clone(),
                        news: self.news.clone(),
                        notifications: p.notifications.clone(),
                        error: p.error.clone(),
                    },
                )
            })
            .collect();

        MarketSnapshot {
            market: self.id,
            views,
        }
    }

    fn aggregated_book(&self) -> (Vec<BookEntry>, Vec<BookEntry>) {
        let mut bids: Vec<(StandingOffer, ParticipantId)> = Vec::new();
        let mut asks: Vec<(StandingOffer, ParticipantId)> = Vec::new();

        for p in self.participants.values() {
            let target = match p.role {
                Role::Buyer => &mut bids,
                Role::Seller => &mut asks,
                Role::Admin => continue,
            };
            for offer in p.offers.iter() {
                target.push((*offer, p.id));
            }
        }

        bids.sort_by(|a, b| {
            b.0.price
                .cmp(&a.0.price)
                .then(a.0.submitted_at.cmp(&b.0.submitted_at))
        });
        asks.sort_by(|a, b| {
            a.0.price
                .cmp(&b.0.price)
                .then(a.0.submitted_at.cmp(&b.0.submitted_at))
        });

        let entries = |offers: Vec<(StandingOffer, ParticipantId)>| {
            offers
                .into_iter()
                .map(|(o, id)| BookEntry {
                    price: o.price,
                    participant: id,
                })
                .collect()
        };
        (entries(bids), entries(asks))
    }

    fn participant_mut(&mut self, id: ParticipantId) -> Result<&mut Participant> {
        self.participants
            .get_mut(&id)
            .ok_or(MarketError::UnknownParticipant(id))
    }
}
