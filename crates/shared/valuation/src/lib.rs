//! Agora Valuation Curves
//!
//! Implementations of the [`ValuationCurve`](agora_ports::ValuationCurve)
//! port. A curve models diminishing marginal utility (buyers) or
//! increasing marginal cost (sellers) as a function of the time still
//! needed to produce or consume previously traded units:
//!
//! - [`LinearBlendCurve`] — continuous blend between a start and an end
//!   value over one production window
//! - [`SteppedCurve`] — piecewise-constant value that jumps at explicit
//!   time boundaries

mod linear;
mod stepped;

pub use linear::LinearBlendCurve;
pub use stepped::SteppedCurve;

// Re-export the port for convenience
pub use agora_ports::ValuationCurve;
