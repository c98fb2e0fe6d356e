use agora_core::{MarketParameters, ParameterChanges};
use rust_decimal::Decimal;

use crate::error::{MarketError, Result};

/// A committed admin intervention
#[derive(Debug, Clone)]
pub struct Intervention {
    pub changes: ParameterChanges,
    /// Broadcast text naming the changed fields and their new values
    pub broadcast: String,
}

/// Replace the market parameters with an admin-supplied record
///
/// The replacement is validated, diffed field-by-field against the
/// current record and, if anything differs, committed as a single
/// atomic update with a version bump. Returns `None` when the
/// replacement matches the current values exactly (no commit, no
/// broadcast).
pub fn apply_update(
    current: &mut MarketParameters,
    replacement: MarketParameters,
) -> Result<Option<Intervention>> {
    validate(&replacement)?;

    let changes = current.diff(&replacement);
    if !changes.any() {
        return Ok(None);
    }

    let broadcast = changes.summary(&replacement);
    *current = MarketParameters {
        version: current.version + 1,
        ..replacement
    };

    Ok(Some(Intervention { changes, broadcast }))
}

fn validate(params: &MarketParameters) -> Result<()> {
    if params.buyer_tax < Decimal::ZERO || params.buyer_tax > Decimal::ONE {
        return Err(MarketError::InvalidParameters(
            "buyer tax must lie within [0, 1]".to_string(),
        ));
    }
    if params.seller_tax < Decimal::ZERO || params.seller_tax > Decimal::ONE {
        return Err(MarketError::InvalidParameters(
            "seller tax must lie within [0, 1]".to_string(),
        ));
    }
    if params.price_floor > params.price_ceiling {
        return Err(MarketError::InvalidParameters(
            "price floor must not exceed the price ceiling".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_changed_fields_commit_and_bump_the_version() {
        let mut current = MarketParameters::new(dec!(0.1), dec!(0), dec!(0), dec!(100));
        let replacement = MarketParameters::new(dec!(0.2), dec!(0), dec!(0), dec!(100));

        let intervention = apply_update(&mut current, replacement).unwrap().unwrap();

        assert!(intervention.changes.buyer_tax);
        assert!(!intervention.changes.seller_tax);
        assert_eq!(current.buyer_tax, dec!(0.2));
        assert_eq!(current.version, 1);
        assert!(intervention.broadcast.contains("buyer tax is now 0.2"));
    }

    #[test]
    fn test_identical_replacement_is_silent() {
        let mut current = MarketParameters::new(dec!(0.1), dec!(0), dec!(0), dec!(100));
        let replacement = current.clone();

        let result = apply_update(&mut current, replacement).unwrap();
        assert!(result.is_none());
        assert_eq!(current.version, 0);
    }

    #[test]
    fn test_inverted_bounds_are_rejected_without_commit() {
        let mut current = MarketParameters::default();
        let before = current.clone();
        let replacement = MarketParameters::new(dec!(0), dec!(0), dec!(80), dec!(40));

        let result = apply_update(&mut current, replacement);
        assert!(matches!(result, Err(MarketError::InvalidParameters(_))));
        assert_eq!(current, before);
    }

    #[test]
    fn test_tax_above_one_is_rejected() {
        let mut current = MarketParameters::default();
        let replacement = MarketParameters::new(dec!(1.5), dec!(0), dec!(0), dec!(100));

        assert!(matches!(
            apply_update(&mut current, replacement),
            Err(MarketError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_floor_equal_to_ceiling_is_allowed() {
        let mut current = MarketParameters::default();
        let replacement = MarketParameters::new(dec!(0), dec!(0), dec!(60), dec!(60));

        assert!(apply_update(&mut current, replacement).unwrap().is_some());
        assert_eq!(current.price_floor, dec!(60));
    }
}
