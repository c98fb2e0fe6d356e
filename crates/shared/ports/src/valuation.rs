use rust_decimal::Decimal;

/// Port for per-unit valuation curves
///
/// A curve maps a participant's cumulative elapsed production or
/// consumption time (in seconds) to their current private per-unit
/// benefit (buyer) or cost (seller). Curves are purely functional;
/// all mutable state stays with the participant.
pub trait ValuationCurve: Send + Sync {
    /// Value of the next unit after `time_needed` seconds of backlog
    fn value_at(&self, time_needed: Decimal) -> Decimal;

    /// Get the name of the curve family
    fn name(&self) -> &str;
}
