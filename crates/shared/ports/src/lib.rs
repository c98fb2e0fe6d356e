//! Agora Ports
//!
//! Traits at the seams of the market engine. Implementations live in
//! their own crates (`agora-clock`, `agora-valuation`) so the engine
//! stays decoupled from concrete time sources and valuation curves.

mod clock;
mod valuation;

pub use clock::Clock;
pub use valuation::ValuationCurve;
