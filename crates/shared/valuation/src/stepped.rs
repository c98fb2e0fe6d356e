use agora_ports::ValuationCurve;
use rust_decimal::Decimal;

/// Piecewise-constant curve that jumps at explicit time boundaries
///
/// The value is `base + step * k` where `k` counts the boundaries at or
/// below the current backlog. Buyers are constructed with a negative
/// step (each crossed boundary lowers utility), sellers with a positive
/// one (each crossed boundary raises cost). This is the calibrated
/// variant used when production facilities have distinct capacities.
pub struct SteppedCurve {
    base: Decimal,
    step: Decimal,
    /// Backlog thresholds in seconds, ascending
    boundaries: Vec<Decimal>,
}

impl SteppedCurve {
    pub fn new(base: Decimal, step: Decimal, mut boundaries: Vec<Decimal>) -> Self {
        boundaries.sort();
        Self {
            base,
            step,
            boundaries,
        }
    }

    /// Buyer utility starting at `max_utility`, dropping by `step` at
    /// each boundary
    pub fn buyer(max_utility: Decimal, step: Decimal, boundaries: Vec<Decimal>) -> Self {
        Self::new(max_utility, -step, boundaries)
    }

    /// Seller cost starting at `min_cost`, rising by `step` at each
    /// boundary
    pub fn seller(min_cost: Decimal, step: Decimal, boundaries: Vec<Decimal>) -> Self {
        Self::new(min_cost, step, boundaries)
    }

    fn boundaries_crossed(&self, time_needed: Decimal) -> usize {
        self.boundaries.iter().filter(|b| time_needed >= **b).count()
    }
}

impl ValuationCurve for SteppedCurve {
    fn value_at(&self, time_needed: Decimal) -> Decimal {
        let crossed = Decimal::from(self.boundaries_crossed(time_needed) as u64);
        self.base + self.step * crossed
    }

    fn name(&self) -> &str {
        "Stepped"
    }
}
