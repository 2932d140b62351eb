//! Typed change signals and the synchronous bus that fans them out to views

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Condition, SortDirection};

/// Something in the store changed. Payloads are informational; subscribers
/// re-query the store for the data they render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Signal {
    SortChanged(SortDirection),
    SearchChanged(String),
    FilterChanged { condition: Option<Condition>, enabled: bool },
    CardPositionChanged { city: String },
    CitiesLoaded { count: usize },
    MapReady,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::SortChanged(_) => SignalKind::SortChanged,
            Signal::SearchChanged(_) => SignalKind::SearchChanged,
            Signal::FilterChanged { .. } => SignalKind::FilterChanged,
            Signal::CardPositionChanged { .. } => SignalKind::CardPositionChanged,
            Signal::CitiesLoaded { .. } => SignalKind::CitiesLoaded,
            Signal::MapReady => SignalKind::MapReady,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SignalKind {
    SortChanged,
    SearchChanged,
    FilterChanged,
    CardPositionChanged,
    CitiesLoaded,
    MapReady,
}

/// Routes from signal kinds to subscriber keys, kept in subscription order.
///
/// The bus only knows keys; the caller resolves a key to the subscriber and
/// delivers the signal. Delivery is synchronous and completes before
/// `publish` returns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalBus<K> {
    routes: Vec<(SignalKind, K)>,
}

impl<K> Default for SignalBus<K> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<K: Copy + PartialEq> SignalBus<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` for `kind` for the lifetime of the bus.
    pub fn subscribe(&mut self, kind: SignalKind, key: K) {
        self.routes.push((kind, key));
    }

    /// Builder form of [`subscribe`](Self::subscribe) for several kinds.
    pub fn with(mut self, key: K, kinds: &[SignalKind]) -> Self {
        for kind in kinds {
            self.subscribe(*kind, key);
        }
        self
    }

    pub fn subscribers(&self, kind: SignalKind) -> impl Iterator<Item = K> + '_ {
        self.routes
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, key)| *key)
    }

    pub fn is_subscribed(&self, kind: SignalKind, key: K) -> bool {
        self.subscribers(kind).any(|k| k == key)
    }

    /// Deliver `signal` to every subscriber of its kind, in subscription
    /// order. Returns the number of deliveries.
    pub fn publish(&self, signal: &Signal, mut deliver: impl FnMut(K, &Signal)) -> usize {
        let mut delivered = 0;
        for key in self.subscribers(signal.kind()) {
            deliver(key, signal);
            delivered += 1;
        }
        tracing::trace!(kind = ?signal.kind(), delivered, "signal published");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_in_subscription_order() {
        let mut bus = SignalBus::new();
        bus.subscribe(SignalKind::SearchChanged, 2u8);
        bus.subscribe(SignalKind::SearchChanged, 1u8);
        bus.subscribe(SignalKind::FilterChanged, 3u8);

        let mut seen = Vec::new();
        let count = bus.publish(&Signal::SearchChanged("par".into()), |key, _| seen.push(key));

        assert_eq!(count, 2);
        assert_eq!(seen, vec![2, 1]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus: SignalBus<u8> = SignalBus::new();
        let count = bus.publish(&Signal::MapReady, |_, _| panic!("no subscribers"));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_builder_registers_every_kind() {
        let bus = SignalBus::new().with(
            'g',
            &[SignalKind::SortChanged, SignalKind::CardPositionChanged],
        );
        assert!(bus.is_subscribed(SignalKind::SortChanged, 'g'));
        assert!(bus.is_subscribed(SignalKind::CardPositionChanged, 'g'));
        assert!(!bus.is_subscribed(SignalKind::FilterChanged, 'g'));
    }
}
