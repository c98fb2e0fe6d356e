//! Agora Core Domain
//!
//! Pure domain types for the Agora double-auction market.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Market events
    MarketEvent,
    // Market-wide parameter record
    MarketParameters,
    ParameterChanges,
    // Participants
    Role,
    // Offers
    StandingOffer,
    // Trades
    Trade,
    TradeRecord,
};
pub use values::{MarketId, ParticipantId, Price, TaxRate, Timestamp, TradeId};
