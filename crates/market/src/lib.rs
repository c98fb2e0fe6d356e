//! Agora Market Engine
//!
//! A continuous double-auction market for economics experiments.
//! Participants act as buyers or sellers, submit bids and asks in real
//! time, and the engine matches crossing offers into trades, maintains
//! running balances, and exposes market state for display.
//!
//! ## Event flow
//!
//! ```text
//! host event ──► Market::process_event
//!                    │ validate against MarketParameters
//!                    │ mutate offer lists / backlog clocks
//!                    ▼
//!               matching::find_match (first crossing pair)
//!                    │ on match
//!                    ▼
//!               settlement::prepare ── all-or-nothing ──► apply
//!                    │
//!                    ▼
//!               MarketSnapshot (one view per participant)
//! ```
//!
//! The engine is synchronous and owns no threads; hosts serialize
//! events per market (the [`MarketRegistry`] does this with a mutex)
//! and drive wall-clock decay by sending periodic `TimeUpdate` events.

mod book;
mod config;
mod error;
mod market;
mod matching;
mod params;
mod participant;
mod registry;
mod settlement;
mod snapshot;

pub use book::{BookSide, OfferList};
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use market::Market;
pub use matching::{MatchFound, execution_price, find_match};
pub use params::Intervention;
pub use participant::Participant;
pub use registry::MarketRegistry;
pub use settlement::TradeOutcome;
pub use snapshot::{BookEntry, MarketSnapshot, ParticipantView, TapePoint};
