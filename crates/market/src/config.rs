use agora_core::MarketParameters;
use rust_decimal::Decimal;

/// Static session configuration for one market
///
/// Fixed at market creation by the experimenter; everything that can
/// change mid-session lives in [`MarketParameters`] instead.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Experimenter-facing description of the session
    pub description: String,
    /// Withhold counterparty identities in trade confirmations
    pub anonymity: bool,
    /// Seconds of production/consumption backlog added per traded unit
    pub time_per_unit: Decimal,
    /// Trading rules in force when the market opens
    pub initial_params: MarketParameters,
}

impl MarketConfig {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_anonymity(mut self, anonymity: bool) -> Self {
        self.anonymity = anonymity;
        self
    }

    pub fn with_time_per_unit(mut self, seconds: Decimal) -> Self {
        self.time_per_unit = seconds;
        self
    }

    pub fn with_initial_params(mut self, params: MarketParameters) -> Self {
        self.initial_params = params;
        self
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            description: "Double auction market".to_string(),
            anonymity: true,
            // Producing or consuming one unit takes ten minutes
            time_per_unit: Decimal::from(600),
            initial_params: MarketParameters::default(),
        }
    }
}
