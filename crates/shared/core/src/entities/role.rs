use serde::{Deserialize, Serialize};

/// Role of a market participant
///
/// Admins steer market parameters at runtime; they never hold offers
/// and are excluded from matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    /// Returns true for roles that may hold offers and trade
    pub fn is_trader(&self) -> bool {
        matches!(self, Role::Buyer | Role::Seller)
    }
}
