use agora_core::{ParticipantId, Price, StandingOffer};

use crate::participant::Participant;

/// A crossable buyer/seller pair found by the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFound {
    pub buyer: ParticipantId,
    pub seller: ParticipantId,
}

/// First-found scan for a crossing pair of best offers
///
/// Buyers are visited in seat order, and for each buyer every seller in
/// seat order; the first seller whose best ask is at or below the
/// buyer's best bid wins. This is deliberately not a price-optimal
/// pairing: it mirrors simple market microstructure where one match is
/// resolved per incoming event and remaining crossings wait for the
/// next event.
///
/// Participants without a standing offer are skipped, so an
/// empty-handed side can never cross.
pub fn find_match(buyers: &[&Participant], sellers: &[&Participant]) -> Option<MatchFound> {
    for buyer in buyers {
        let Some(bid) = buyer.offers.best() else {
            continue;
        };
        for seller in sellers {
            let Some(ask) = seller.offers.best() else {
                continue;
            };
            if ask.price <= bid.price {
                return Some(MatchFound {
                    buyer: buyer.id,
                    seller: seller.id,
                });
            }
        }
    }
    None
}

/// Price-time priority: the resting (earlier) offer's price is honored
///
/// The newly arriving, crossing order never moves the price. On an
/// exact timestamp tie the ask's price wins; the tie-break is arbitrary
/// but fixed, so replays are deterministic.
pub fn execution_price(bid: &StandingOffer, ask: &StandingOffer) -> Price {
    if bid.submitted_at < ask.submitted_at {
        bid.price
    } else {
        ask.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::Timestamp;
    use agora_valuation::LinearBlendCurve;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    use agora_core::MarketParameters;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2022, 8, 1, 9, 0, 0).unwrap()
    }

    fn buyer_with_bid(price: rust_decimal::Decimal, at: Timestamp) -> Participant {
        let curve = Arc::new(LinearBlendCurve::buyer(dec!(100), dec!(50), dec!(600)));
        let mut p = Participant::buyer(curve, t0());
        p.offers
            .submit(price, at, &MarketParameters::default())
            .unwrap();
        p
    }

    fn seller_with_ask(price: rust_decimal::Decimal, at: Timestamp) -> Participant {
        let curve = Arc::new(LinearBlendCurve::seller(dec!(50), dec!(100), dec!(600)));
        let mut p = Participant::seller(curve, t0());
        p.offers
            .submit(price, at, &MarketParameters::default())
            .unwrap();
        p
    }

    #[test]
    fn test_crossing_pair_is_found() {
        let buyer = buyer_with_bid(dec!(60), t0());
        let seller = seller_with_ask(dec!(50), t0());

        let m = find_match(&[&buyer], &[&seller]).unwrap();
        assert_eq!(m.buyer, buyer.id);
        assert_eq!(m.seller, seller.id);
    }

    #[test]
    fn test_no_match_when_best_ask_above_best_bid() {
        let buyer = buyer_with_bid(dec!(40), t0());
        let seller = seller_with_ask(dec!(50), t0());

        assert!(find_match(&[&buyer], &[&seller]).is_none());
    }

    #[test]
    fn test_first_found_wins_over_better_price() {
        let buyer = buyer_with_bid(dec!(60), t0());
        let seller_first = seller_with_ask(dec!(55), t0());
        let seller_cheaper = seller_with_ask(dec!(45), t0());

        // Seat order decides, not price: the first crossing seller wins
        let m = find_match(&[&buyer], &[&seller_first, &seller_cheaper]).unwrap();
        assert_eq!(m.seller, seller_first.id);
    }

    #[test]
    fn test_participants_without_offers_never_match() {
        let curve = Arc::new(LinearBlendCurve::buyer(dec!(100), dec!(50), dec!(600)));
        let empty_buyer = Participant::buyer(curve, t0());
        let seller = seller_with_ask(dec!(0), t0());

        assert!(find_match(&[&empty_buyer], &[&seller]).is_none());
    }

    #[test]
    fn test_resting_offer_sets_the_price() {
        let ask = StandingOffer::new(dec!(50), t0());
        let bid = StandingOffer::new(dec!(60), t0() + Duration::seconds(10));

        // Ask was resting first: trade at the ask
        assert_eq!(execution_price(&bid, &ask), dec!(50));

        let bid_first = StandingOffer::new(dec!(60), t0());
        let late_ask = StandingOffer::new(dec!(50), t0() + Duration::seconds(10));
        assert_eq!(execution_price(&bid_first, &late_ask), dec!(60));
    }

    #[test]
    fn test_timestamp_tie_executes_at_the_ask() {
        let bid = StandingOffer::new(dec!(60), t0());
        let ask = StandingOffer::new(dec!(50), t0());

        assert_eq!(execution_price(&bid, &ask), dec!(50));
    }
}
