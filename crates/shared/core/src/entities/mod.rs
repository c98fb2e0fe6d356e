mod event;
mod offer;
mod params;
mod role;
mod trade;

pub use event::MarketEvent;
pub use offer::StandingOffer;
pub use params::{MarketParameters, ParameterChanges};
pub use role::Role;
pub use trade::{Trade, TradeRecord};
