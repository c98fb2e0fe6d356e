//! Scripted demo session against the market engine
//!
//! Seats two buyers, two sellers and an admin, then replays a fixed
//! event script: quoting, a trade, a tax intervention, a withdrawal and
//! decay ticks. The clock is injected, so the run is reproducible; set
//! `RUST_LOG=debug` to watch every event land.

use std::sync::Arc;

use agora_clock::ManualClock;
use agora_core::{MarketEvent, MarketId, MarketParameters, ParticipantId};
use agora_market::{Market, MarketConfig, MarketError, MarketRegistry, MarketSnapshot};
use agora_valuation::LinearBlendCurve;
use chrono::Duration;
use log::info;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let clock = Arc::new(ManualClock::fixed());
    let config = MarketConfig::new("Demo: taxed double auction")
        .with_initial_params(MarketParameters::new(dec!(0.1), dec!(0), dec!(0), dec!(200)));

    let mut market = Market::new(config, clock.clone());
    let alice = market.add_buyer(Arc::new(LinearBlendCurve::buyer(
        dec!(100),
        dec!(50),
        dec!(600),
    )));
    let bob = market.add_buyer(Arc::new(LinearBlendCurve::buyer(
        dec!(90),
        dec!(45),
        dec!(600),
    )));
    let carol = market.add_seller(Arc::new(LinearBlendCurve::seller(
        dec!(50),
        dec!(100),
        dec!(600),
    )));
    let dave = market.add_seller(Arc::new(LinearBlendCurve::seller(
        dec!(55),
        dec!(110),
        dec!(600),
    )));
    let admin = market.add_admin();

    let registry = MarketRegistry::new();
    let market_id = registry.insert(market);

    // Opening quotes; nothing crosses yet
    drive(&registry, &market_id, carol, MarketEvent::Offer { price: dec!(80) })?;
    clock.advance(Duration::seconds(5));
    drive(&registry, &market_id, dave, MarketEvent::Offer { price: dec!(75) })?;
    clock.advance(Duration::seconds(5));
    drive(&registry, &market_id, alice, MarketEvent::Offer { price: dec!(60) })?;

    // An ask above the ceiling is refused but does not fail the session
    let snap = drive(&registry, &market_id, dave, MarketEvent::Offer { price: dec!(250) })?;
    if let Some(view) = snap.view(&dave) {
        if let Some(error) = &view.error {
            info!("dave's quote was refused: {error}");
        }
    }

    // Bob lifts dave's resting ask; the trade executes at 75
    clock.advance(Duration::seconds(30));
    drive(&registry, &market_id, bob, MarketEvent::Offer { price: dec!(75) })?;

    // Mid-session intervention: the buyer tax doubles
    clock.advance(Duration::seconds(20));
    drive(
        &registry,
        &market_id,
        admin,
        MarketEvent::MarketUpdate {
            buyer_tax: dec!(0.2),
            seller_tax: dec!(0),
            price_floor: dec!(0),
            price_ceiling: dec!(200),
        },
    )?;

    // Alice requotes and carol meets her; alice's resting bid sets the price
    drive(&registry, &market_id, alice, MarketEvent::Withdrawal { price: dec!(60) })?;
    drive(&registry, &market_id, alice, MarketEvent::Offer { price: dec!(78) })?;
    clock.advance(Duration::seconds(10));
    drive(&registry, &market_id, carol, MarketEvent::Offer { price: dec!(70) })?;

    // A minute of production works down the backlogs
    clock.advance(Duration::seconds(60));
    for trader in [alice, bob, carol, dave] {
        drive(&registry, &market_id, trader, MarketEvent::TimeUpdate)?;
    }

    let snapshot = registry
        .with_market(&market_id, |m| {
            for trade in m.trades() {
                info!(
                    "trade after {}s: price {} (buyer profit {}, seller profit {}, tax take {})",
                    trade.seconds,
                    trade.price,
                    trade.buyer_profit,
                    trade.seller_profit,
                    trade.total_tax()
                );
            }
            m.snapshot()
        })
        .ok_or_else(|| MarketError::Internal(format!("no market {market_id}")))?;

    print_view(&snapshot, &alice, "alice")?;
    print_view(&snapshot, &admin, "admin")?;
    Ok(())
}

fn drive(
    registry: &MarketRegistry,
    market: &MarketId,
    sender: ParticipantId,
    event: MarketEvent,
) -> Result<MarketSnapshot, MarketError> {
    registry
        .with_market(market, |m| m.process_event(sender, event))
        .ok_or_else(|| MarketError::Internal(format!("no market {market}")))?
}

fn print_view(
    snapshot: &MarketSnapshot,
    participant: &ParticipantId,
    label: &str,
) -> Result<(), serde_json::Error> {
    if let Some(view) = snapshot.view(participant) {
        println!("--- {label} ---");
        println!("{}", serde_json::to_string_pretty(view)?);
    }
    Ok(())
}
