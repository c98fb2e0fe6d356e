use agora_core::{ParticipantId, Price};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("You are not allowed to bid below the price floor.")]
    BidBelowFloor,

    #[error("You are not allowed to ask above the price ceiling.")]
    AskAboveCeiling,

    #[error("Trade price {price} violates the price restrictions [{floor}, {ceiling}].")]
    PriceRestrictionViolation {
        price: Price,
        floor: Price,
        ceiling: Price,
    },

    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Only an admin may change market parameters")]
    NotAdmin,

    #[error("Admins do not hold offers")]
    AdminCannotTrade,

    #[error("Invalid market parameters: {0}")]
    InvalidParameters(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Soft rejections surface as the participant's error message on the
    /// returned snapshot; everything else fails the event outright.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MarketError::BidBelowFloor
                | MarketError::AskAboveCeiling
                | MarketError::PriceRestrictionViolation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
