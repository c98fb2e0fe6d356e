use agora_core::{MarketParameters, Timestamp, Trade, TradeRecord};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::matching;
use crate::participant::Participant;

/// Everything a confirmed match settles to, computed before any state
/// is touched
///
/// [`prepare`] does all the fallible work (price re-check, profit
/// computation, record construction) against immutable references;
/// [`apply_buyer`]/[`apply_seller`] then mutate unconditionally. An
/// event handler that only mutates after `prepare` succeeded gets
/// all-or-nothing settlement for free.
pub struct TradeOutcome {
    pub trade: Trade,
    pub buyer_record: TradeRecord,
    pub seller_record: TradeRecord,
    pub buyer_note: String,
    pub seller_note: String,
    /// Public announcement shown to the whole market
    pub news: String,
}

/// Validate a matched pair and compute the full settlement
///
/// The price re-check against the floor and ceiling is defensive:
/// submission-time validation normally keeps resting offers inside the
/// bounds, but an admin intervention can strand older offers outside
/// them, and a bid is only floor-checked on entry (a bid above the
/// ceiling is legal to submit yet must not trade there).
pub fn prepare(
    buyer: &Participant,
    seller: &Participant,
    params: &MarketParameters,
    config: &MarketConfig,
    now: Timestamp,
    opened_at: Timestamp,
) -> Result<TradeOutcome> {
    let bid = buyer
        .offers
        .best()
        .ok_or_else(|| MarketError::Internal("matched buyer has no standing bid".to_string()))?;
    let ask = seller
        .offers
        .best()
        .ok_or_else(|| MarketError::Internal("matched seller has no standing ask".to_string()))?;

    let price = matching::execution_price(bid, ask);
    if !params.allows_price(price) {
        return Err(MarketError::PriceRestrictionViolation {
            price,
            floor: params.price_floor,
            ceiling: params.price_ceiling,
        });
    }

    let buyer_profit = buyer.valuation - price - params.buyer_tax * price;
    let seller_profit = price - seller.valuation - params.seller_tax * price;

    let trade = Trade {
        id: Uuid::new_v4(),
        buyer: buyer.id,
        seller: seller.id,
        price,
        buyer_valuation: buyer.valuation,
        seller_cost: seller.valuation,
        buyer_profit,
        seller_profit,
        buyer_balance: buyer.balance + buyer_profit,
        seller_balance: seller.balance + seller_profit,
        buyer_tax: params.buyer_tax,
        seller_tax: params.seller_tax,
        price_floor: params.price_floor,
        price_ceiling: params.price_ceiling,
        seconds: (now - opened_at).num_seconds(),
        executed_at: now,
    };

    let buyer_record = record_for(&trade, buyer_profit, now);
    let seller_record = record_for(&trade, seller_profit, now);

    let (buyer_note, seller_note, news) = messages(&trade, config.anonymity);

    Ok(TradeOutcome {
        trade,
        buyer_record,
        seller_record,
        buyer_note,
        seller_note,
        news,
    })
}

/// Apply the buyer's half of a prepared settlement (infallible)
pub fn apply_buyer(buyer: &mut Participant, outcome: &TradeOutcome, time_per_unit: Decimal) {
    buyer.offers.take_best();
    buyer.balance += outcome.trade.buyer_profit;
    buyer.history.push_front(outcome.buyer_record.clone());
    buyer.notify(outcome.buyer_note.clone());
    buyer.add_production_time(time_per_unit);
}

/// Apply the seller's half of a prepared settlement (infallible)
pub fn apply_seller(seller: &mut Participant, outcome: &TradeOutcome, time_per_unit: Decimal) {
    seller.offers.take_best();
    seller.balance += outcome.trade.seller_profit;
    seller.history.push_front(outcome.seller_record.clone());
    seller.notify(outcome.seller_note.clone());
    seller.add_production_time(time_per_unit);
}

fn record_for(trade: &Trade, profit: Decimal, now: Timestamp) -> TradeRecord {
    TradeRecord {
        price: trade.price,
        time: now,
        buyer_tax: trade.buyer_tax,
        seller_tax: trade.seller_tax,
        price_floor: trade.price_floor,
        price_ceiling: trade.price_ceiling,
        profit: profit.round_dp(2),
    }
}

/// Confirmation texts for both parties plus the public announcement
///
/// The anonymity flag decides whether counterparty identities appear;
/// the texts themselves are opaque to the engine and passed through to
/// the host unchanged.
fn messages(trade: &Trade, anonymity: bool) -> (String, String, String) {
    if anonymity {
        (
            format!("You bought one unit at {}.", trade.price),
            format!("You sold one unit at {}.", trade.price),
            format!("Trade concluded at {}.", trade.price),
        )
    } else {
        (
            format!(
                "You bought one unit at {} from participant {}.",
                trade.price, trade.seller
            ),
            format!(
                "You sold one unit at {} to participant {}.",
                trade.price, trade.buyer
            ),
            format!(
                "Participant {} bought one unit from participant {} at {}.",
                trade.buyer, trade.seller, trade.price
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_valuation::LinearBlendCurve;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2022, 8, 1, 9, 0, 0).unwrap()
    }

    fn crossed_pair() -> (Participant, Participant) {
        let params = MarketParameters::default();
        let mut buyer = Participant::buyer(
            Arc::new(LinearBlendCurve::buyer(dec!(100), dec!(50), dec!(600))),
            t0(),
        );
        let mut seller = Participant::seller(
            Arc::new(LinearBlendCurve::seller(dec!(50), dec!(100), dec!(600))),
            t0(),
        );
        // Ask rests first, so trades execute at the ask
        seller.offers.submit(dec!(50), t0(), &params).unwrap();
        buyer
            .offers
            .submit(dec!(60), t0() + Duration::seconds(5), &params)
            .unwrap();
        (buyer, seller)
    }

    #[test]
    fn test_untaxed_profits_split_the_surplus() {
        let (buyer, seller) = crossed_pair();
        let params = MarketParameters::default();
        let config = MarketConfig::default();

        let outcome = prepare(
            &buyer,
            &seller,
            &params,
            &config,
            t0() + Duration::seconds(5),
            t0(),
        )
        .unwrap();

        assert_eq!(outcome.trade.price, dec!(50));
        // Buyer values the unit at 100, pays 50
        assert_eq!(outcome.trade.buyer_profit, dec!(50));
        // Seller's cost is 50, receives 50
        assert_eq!(outcome.trade.seller_profit, dec!(0));
        assert_eq!(outcome.trade.seconds, 5);
    }

    #[test]
    fn test_taxes_reduce_both_profits() {
        let (buyer, seller) = crossed_pair();
        let params = MarketParameters::new(dec!(0.1), dec!(0.2), dec!(0), dec!(1000));
        let config = MarketConfig::default();

        let outcome = prepare(&buyer, &seller, &params, &config, t0(), t0()).unwrap();

        // 100 - 50 - 0.1 * 50 = 45
        assert_eq!(outcome.trade.buyer_profit, dec!(45));
        // 50 - 50 - 0.2 * 50 = -10
        assert_eq!(outcome.trade.seller_profit, dec!(-10));
        assert_eq!(outcome.trade.buyer_tax, dec!(0.1));
        assert_eq!(outcome.trade.seller_tax, dec!(0.2));
    }

    #[test]
    fn test_price_outside_bounds_is_rejected() {
        let (buyer, seller) = crossed_pair();
        // Ceiling below the resting ask of 50
        let params = MarketParameters::new(dec!(0), dec!(0), dec!(0), dec!(45));
        let config = MarketConfig::default();

        let result = prepare(&buyer, &seller, &params, &config, t0(), t0());
        assert_eq!(
            result.err(),
            Some(MarketError::PriceRestrictionViolation {
                price: dec!(50),
                floor: dec!(0),
                ceiling: dec!(45),
            })
        );
    }

    #[test]
    fn test_apply_moves_balances_history_and_backlog() {
        let (mut buyer, mut seller) = crossed_pair();
        let params = MarketParameters::default();
        let config = MarketConfig::default();

        let outcome = prepare(&buyer, &seller, &params, &config, t0(), t0()).unwrap();
        apply_buyer(&mut buyer, &outcome, dec!(600));
        apply_seller(&mut seller, &outcome, dec!(600));

        assert_eq!(buyer.balance, dec!(50));
        assert_eq!(seller.balance, dec!(0));
        assert!(buyer.offers.is_empty());
        assert!(seller.offers.is_empty());
        assert_eq!(buyer.history.len(), 1);
        assert_eq!(buyer.history[0].profit, dec!(50));
        assert_eq!(buyer.time_needed, dec!(600));
        // Valuation recomputed from the new backlog
        assert_eq!(buyer.valuation, dec!(50));
        assert_eq!(buyer.notifications.len(), 1);
    }

    #[test]
    fn test_anonymous_confirmations_hide_the_counterparty() {
        let (buyer, seller) = crossed_pair();
        let params = MarketParameters::default();
        let config = MarketConfig::default().with_anonymity(true);

        let outcome = prepare(&buyer, &seller, &params, &config, t0(), t0()).unwrap();
        assert_eq!(outcome.buyer_note, "You bought one unit at 50.");
        assert!(!outcome.seller_note.contains(&buyer.id.to_string()));
    }

    #[test]
    fn test_identified_confirmations_name_the_counterparty() {
        let (buyer, seller) = crossed_pair();
        let params = MarketParameters::default();
        let config = MarketConfig::default().with_anonymity(false);

        let outcome = prepare(&buyer, &seller, &params, &config, t0(), t0()).unwrap();
        assert!(outcome.buyer_note.contains(&seller.id.to_string()));
        assert!(outcome.seller_note.contains(&buyer.id.to_string()));
    }
}
