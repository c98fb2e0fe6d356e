//! Agora Clock Infrastructure
//!
//! Time sources behind the [`Clock`] port:
//!
//! - [`SystemClock`] — real wall-clock time for live sessions
//! - [`ManualClock`] — frozen time advanced by hand, for deterministic
//!   tests and scripted simulations

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use agora_ports::Clock;
