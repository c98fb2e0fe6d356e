use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{Price, TaxRate};

/// Market-wide trading rules, shared by all participants
///
/// A single mutable record per market. Only an admin event replaces it;
/// matching and settlement read the then-current values at trade time,
/// so earlier trades are never retroactively affected. `version` goes
/// up by one on every committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParameters {
    /// Share of the trade price the buyer pays in taxes, in [0, 1]
    pub buyer_tax: TaxRate,
    /// Share of the trade price the seller pays in taxes, in [0, 1]
    pub seller_tax: TaxRate,
    /// Buyers may not bid below this price
    pub price_floor: Price,
    /// Sellers may not ask above this price
    pub price_ceiling: Price,
    /// Bumped on every committed admin intervention
    pub version: u64,
}

impl MarketParameters {
    pub fn new(
        buyer_tax: TaxRate,
        seller_tax: TaxRate,
        price_floor: Price,
        price_ceiling: Price,
    ) -> Self {
        Self {
            buyer_tax,
            seller_tax,
            price_floor,
            price_ceiling,
            version: 0,
        }
    }

    /// Field-by-field comparison against a replacement record
    ///
    /// `version` is bookkeeping and takes no part in the diff.
    pub fn diff(&self, new: &MarketParameters) -> ParameterChanges {
        ParameterChanges {
            buyer_tax: self.buyer_tax != new.buyer_tax,
            seller_tax: self.seller_tax != new.seller_tax,
            price_floor: self.price_floor != new.price_floor,
            price_ceiling: self.price_ceiling != new.price_ceiling,
        }
    }

    /// Returns true if a trade at `price` respects the floor and ceiling
    pub fn allows_price(&self, price: Price) -> bool {
        price >= self.price_floor && price <= self.price_ceiling
    }
}

impl Default for MarketParameters {
    fn default() -> Self {
        Self {
            buyer_tax: Decimal::ZERO,
            seller_tax: Decimal::ZERO,
            price_floor: Decimal::ZERO,
            price_ceiling: Decimal::from(1000),
            version: 0,
        }
    }
}

/// Change-set produced by diffing the current parameters against an
/// admin-supplied replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChanges {
    pub buyer_tax: bool,
    pub seller_tax: bool,
    pub price_floor: bool,
    pub price_ceiling: bool,
}

impl ParameterChanges {
    /// Returns true if any field differs
    pub fn any(&self) -> bool {
        self.buyer_tax || self.seller_tax || self.price_floor || self.price_ceiling
    }

    /// One-line broadcast text naming exactly the changed fields and
    /// their new values
    pub fn summary(&self, new: &MarketParameters) -> String {
        let mut parts = Vec::new();
        if self.buyer_tax {
            parts.push(format!("buyer tax is now {}", new.buyer_tax));
        }
        if self.seller_tax {
            parts.push(format!("seller tax is now {}", new.seller_tax));
        }
        if self.price_floor {
            parts.push(format!("price floor is now {}", new.price_floor));
        }
        if self.price_ceiling {
            parts.push(format!("price ceiling is now {}", new.price_ceiling));
        }
        format!("Market update: {}.", parts.join("; "))
    }
}
