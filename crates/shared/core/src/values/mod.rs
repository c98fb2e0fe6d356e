use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Tax rate as a fraction of the trade price (0.1 = 10%)
pub type TaxRate = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Unique identifier for a market participant
pub type ParticipantId = Uuid;

/// Unique identifier for a trade
pub type TradeId = Uuid;

/// Unique identifier for a market (one group of participants)
pub type MarketId = Uuid;
