use std::sync::Mutex;

use agora_core::MarketId;
use dashmap::DashMap;
use log::debug;

use crate::market::Market;

/// Holder for independent markets running side by side
///
/// Markets share no state, so different markets may be driven from
/// different threads; within one market the mutex serializes events,
/// which the engine requires (matching and settlement tolerate no
/// partial updates).
#[derive(Default)]
pub struct MarketRegistry {
    markets: DashMap<MarketId, Mutex<Market>>,
}

impl MarketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a market; returns its id
    pub fn insert(&self, market: Market) -> MarketId {
        let id = market.id();
        debug!("registry: market {} registered", id);
        self.markets.insert(id, Mutex::new(market));
        id
    }

    /// Run `f` against one market with events serialized
    ///
    /// Returns `None` if no market with that id exists.
    pub fn with_market<R>(&self, id: &MarketId, f: impl FnOnce(&mut Market) -> R) -> Option<R> {
        let entry = self.markets.get(id)?;
        let mut market = match entry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Some(f(&mut market))
    }

    /// Drop a market at session end
    pub fn remove(&self, id: &MarketId) -> Option<Market> {
        self.markets.remove(id).map(|(_, m)| match m.into_inner() {
            Ok(market) => market,
            Err(poisoned) => poisoned.into_inner(),
        })
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
