use agora_core::{MarketParameters, Price, StandingOffer, Timestamp};

use crate::error::{MarketError, Result};

/// Which half of the market an offer list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    Bid,
    Ask,
}

/// One participant's standing offers, kept best-first
///
/// Bids sort descending by price, asks ascending; price ties go to the
/// earlier submission. The best offer is always at index 0, so a
/// participant's effective current offer is an O(1) read. An empty list
/// means the participant has no standing offer and can never cross.
#[derive(Debug, Clone)]
pub struct OfferList {
    side: BookSide,
    offers: Vec<StandingOffer>,
}

impl OfferList {
    pub fn bids() -> Self {
        Self {
            side: BookSide::Bid,
            offers: Vec::new(),
        }
    }

    pub fn asks() -> Self {
        Self {
            side: BookSide::Ask,
            offers: Vec::new(),
        }
    }

    pub fn side(&self) -> BookSide {
        self.side
    }

    /// Record a new offer and re-derive the best one
    ///
    /// Rejects prices outside the current market rules for this side
    /// (bids below the floor, asks above the ceiling); a rejected offer
    /// is not recorded.
    pub fn submit(
        &mut self,
        price: Price,
        submitted_at: Timestamp,
        params: &MarketParameters,
    ) -> Result<()> {
        match self.side {
            BookSide::Bid if price < params.price_floor => return Err(MarketError::BidBelowFloor),
            BookSide::Ask if price > params.price_ceiling => {
                return Err(MarketError::AskAboveCeiling);
            }
            _ => {}
        }

        self.offers.push(StandingOffer::new(price, submitted_at));
        self.resort();
        Ok(())
    }

    /// Remove the first offer at exactly `price`, if any
    pub fn withdraw(&mut self, price: Price) -> Option<StandingOffer> {
        let pos = self.offers.iter().position(|o| o.price == price)?;
        Some(self.offers.remove(pos))
    }

    /// Remove one specific offer (price and timestamp must both match)
    pub(crate) fn withdraw_exact(&mut self, offer: &StandingOffer) -> bool {
        match self.offers.iter().position(|o| o == offer) {
            Some(pos) => {
                self.offers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// The effective current offer: highest bid or lowest ask
    pub fn best(&self) -> Option<&StandingOffer> {
        self.offers.first()
    }

    /// Remove and return the best offer
    pub fn take_best(&mut self) -> Option<StandingOffer> {
        if self.offers.is_empty() {
            None
        } else {
            Some(self.offers.remove(0))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StandingOffer> {
        self.offers.iter()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    fn resort(&mut self) {
        match self.side {
            BookSide::Bid => self.offers.sort_by(|a, b| {
                b.price
                    .cmp(&a.price)
                    .then(a.submitted_at.cmp(&b.submitted_at))
            }),
            BookSide::Ask => self.offers.sort_by(|a, b| {
                a.price
                    .cmp(&b.price)
                    .then(a.submitted_at.cmp(&b.submitted_at))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2022, 8, 1, 9, 0, 0).unwrap()
    }

    fn open_params() -> MarketParameters {
        MarketParameters::default()
    }

    #[test]
    fn test_bids_keep_highest_first() {
        let mut bids = OfferList::bids();
        let params = open_params();

        bids.submit(dec!(40), t0(), &params).unwrap();
        bids.submit(dec!(60), t0() + Duration::seconds(1), &params)
            .unwrap();
        bids.submit(dec!(50), t0() + Duration::seconds(2), &params)
            .unwrap();

        assert_eq!(bids.best().unwrap().price, dec!(60));
        let prices: Vec<_> = bids.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![dec!(60), dec!(50), dec!(40)]);
    }

    #[test]
    fn test_asks_keep_lowest_first() {
        let mut asks = OfferList::asks();
        let params = open_params();

        asks.submit(dec!(70), t0(), &params).unwrap();
        asks.submit(dec!(55), t0() + Duration::seconds(1), &params)
            .unwrap();

        assert_eq!(asks.best().unwrap().price, dec!(55));
    }

    #[test]
    fn test_price_ties_go_to_the_earlier_submission() {
        let mut bids = OfferList::bids();
        let params = open_params();

        bids.submit(dec!(50), t0() + Duration::seconds(5), &params)
            .unwrap();
        bids.submit(dec!(50), t0(), &params).unwrap();

        assert_eq!(bids.best().unwrap().submitted_at, t0());
    }

    #[test]
    fn test_bid_below_floor_is_rejected_and_not_recorded() {
        let mut bids = OfferList::bids();
        let params = MarketParameters::new(dec!(0), dec!(0), dec!(40), dec!(100));

        let result = bids.submit(dec!(30), t0(), &params);
        assert_eq!(result, Err(MarketError::BidBelowFloor));
        assert!(bids.is_empty());
    }

    #[test]
    fn test_ask_above_ceiling_is_rejected_and_not_recorded() {
        let mut asks = OfferList::asks();
        let params = MarketParameters::new(dec!(0), dec!(0), dec!(0), dec!(100));

        let result = asks.submit(dec!(120), t0(), &params);
        assert_eq!(result, Err(MarketError::AskAboveCeiling));
        assert!(asks.is_empty());
    }

    #[test]
    fn test_offers_at_the_bounds_are_accepted() {
        let params = MarketParameters::new(dec!(0), dec!(0), dec!(40), dec!(100));

        let mut bids = OfferList::bids();
        assert!(bids.submit(dec!(40), t0(), &params).is_ok());

        let mut asks = OfferList::asks();
        assert!(asks.submit(dec!(100), t0(), &params).is_ok());
    }

    #[test]
    fn test_withdraw_restores_previous_best() {
        let mut bids = OfferList::bids();
        let params = open_params();

        bids.submit(dec!(50), t0(), &params).unwrap();
        bids.submit(dec!(60), t0() + Duration::seconds(1), &params)
            .unwrap();

        let withdrawn = bids.withdraw(dec!(60)).unwrap();
        assert_eq!(withdrawn.price, dec!(60));
        assert_eq!(bids.best().unwrap().price, dec!(50));
    }

    #[test]
    fn test_withdrawing_the_last_offer_leaves_no_best() {
        let mut asks = OfferList::asks();
        let params = open_params();

        asks.submit(dec!(55), t0(), &params).unwrap();
        asks.withdraw(dec!(55));

        assert!(asks.best().is_none());
        assert!(asks.is_empty());
    }

    #[test]
    fn test_withdraw_of_unknown_price_is_a_noop() {
        let mut bids = OfferList::bids();
        let params = open_params();

        bids.submit(dec!(50), t0(), &params).unwrap();
        assert!(bids.withdraw(dec!(99)).is_none());
        assert_eq!(bids.len(), 1);
    }

    #[test]
    fn test_submit_then_withdraw_round_trips() {
        let mut bids = OfferList::bids();
        let params = open_params();

        bids.submit(dec!(45), t0(), &params).unwrap();
        let before: Vec<_> = bids.iter().copied().collect();

        bids.submit(dec!(52), t0() + Duration::seconds(1), &params)
            .unwrap();
        bids.withdraw(dec!(52));

        let after: Vec<_> = bids.iter().copied().collect();
        assert_eq!(before, after);
    }
}
