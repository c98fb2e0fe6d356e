use serde::{Deserialize, Serialize};

use crate::values::{Price, TaxRate};

/// One participant input event, the only way market state changes
///
/// Hosts deliver these as tagged payloads; deserialization rejects
/// unknown tags and malformed fields at the boundary, so the engine
/// only ever sees well-formed events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// Submit a new bid (buyer) or ask (seller)
    Offer { price: Price },
    /// Remove one standing offer at exactly this price
    Withdrawal { price: Price },
    /// Advance the wall-clock decay of the sender's elapsed time
    TimeUpdate,
    /// Admin-only full replacement of the market parameters
    MarketUpdate {
        buyer_tax: TaxRate,
        seller_tax: TaxRate,
        price_floor: Price,
        price_ceiling: Price,
    },
    /// Remove one entry from the sender's notification queue
    NotificationDeletion { index: usize },
}
