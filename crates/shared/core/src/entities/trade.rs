use serde::{Deserialize, Serialize};

use crate::values::{ParticipantId, Price, TaxRate, Timestamp, TradeId};
use rust_decimal::Decimal;

/// Immutable record of one concluded trade (one unit, one buyer, one seller)
///
/// Created once per match and never mutated. Captures the tax rates and
/// price bounds in force at trade time; later parameter interventions do
/// not touch it. The market keeps every trade for host-side export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub buyer: ParticipantId,
    pub seller: ParticipantId,
    /// Amount of money exchanged between buyer and seller, excl. taxes
    pub price: Price,
    /// Buyer's marginal utility of the unit at trade time
    pub buyer_valuation: Decimal,
    /// Seller's marginal production cost of the unit at trade time
    pub seller_cost: Decimal,
    pub buyer_profit: Decimal,
    pub seller_profit: Decimal,
    /// Buyer's balance after this trade
    pub buyer_balance: Decimal,
    /// Seller's balance after this trade
    pub seller_balance: Decimal,
    pub buyer_tax: TaxRate,
    pub seller_tax: TaxRate,
    pub price_floor: Price,
    pub price_ceiling: Price,
    /// Seconds since market opening
    pub seconds: i64,
    pub executed_at: Timestamp,
}

impl Trade {
    /// Total tax collected on this trade
    pub fn total_tax(&self) -> Decimal {
        (self.buyer_tax + self.seller_tax) * self.price
    }
}

/// One entry in a participant's private trading history
///
/// Histories are kept most-recent-first; `profit` is the owner's own
/// profit from the trade, which differs between the two parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub price: Price,
    pub time: Timestamp,
    pub buyer_tax: TaxRate,
    pub seller_tax: TaxRate,
    pub price_floor: Price,
    pub price_ceiling: Price,
    pub profit: Decimal,
}
