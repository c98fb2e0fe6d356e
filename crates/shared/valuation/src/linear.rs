use agora_ports::ValuationCurve;
use rust_decimal::Decimal;

/// Continuous linear blend from `start` (no backlog) to `end` (a full
/// production window of backlog)
///
/// With a window of `w` seconds, the value at backlog `t` is the
/// time-weighted mix of the two levels:
///
/// ```text
/// value(t) = (max(w - t, 0) * start + (w - max(w - t, 0)) * end) / w
/// ```
///
/// Buyers blend downwards (utility falls as consumption piles up),
/// sellers upwards (cost rises as production piles up). Results are
/// rounded to two decimal places, cent precision.
pub struct LinearBlendCurve {
    start: Decimal,
    end: Decimal,
    window: Decimal,
}

impl LinearBlendCurve {
    pub fn new(start: Decimal, end: Decimal, window: Decimal) -> Self {
        debug_assert!(window > Decimal::ZERO);
        Self { start, end, window }
    }

    /// Buyer utility falling from `max_utility` to `min_utility`
    pub fn buyer(max_utility: Decimal, min_utility: Decimal, window: Decimal) -> Self {
        Self::new(max_utility, min_utility, window)
    }

    /// Seller cost rising from `min_cost` to `max_cost`
    pub fn seller(min_cost: Decimal, max_cost: Decimal, window: Decimal) -> Self {
        Self::new(min_cost, max_cost, window)
    }
}

impl ValuationCurve for LinearBlendCurve {
    fn value_at(&self, time_needed: Decimal) -> Decimal {
        let fresh = (self.window - time_needed).max(Decimal::ZERO);
        let blended = (fresh * self.start + (self.window - fresh) * self.end) / self.window;
        blended.round_dp(2)
    }

    fn name(&self) -> &str {
        "LinearBlend"
    }
}
