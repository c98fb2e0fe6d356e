use serde::{Deserialize, Serialize};

use crate::values::{Price, Timestamp};

/// A standing bid or ask belonging to exactly one participant
///
/// A participant may hold several offers at once; the list they sit in
/// keeps the best one (highest bid / lowest ask) at the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingOffer {
    pub price: Price,
    pub submitted_at: Timestamp,
}

impl StandingOffer {
    pub fn new(price: Price, submitted_at: Timestamp) -> Self {
        Self {
            price,
            submitted_at,
        }
    }
}
