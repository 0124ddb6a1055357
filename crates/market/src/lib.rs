//! `storehub-market` — the cart/inventory/checkout consistency engine.
//!
//! Everything with a real invariant lives here: how a product's stock,
//! publication, and "held by a cart" state evolve as buyers add items, merge
//! sessions at login, soft-delete listings, and convert carts into orders.
//!
//! All mutable marketplace state sits behind a single [`store::MarketStore`].
//! Engine operations run as closures under its write guard, validating fully
//! before mutating, which is what makes checkout all-or-nothing and keeps two
//! racing decrements from ever driving stock negative. Integration events go
//! out on the bus only after the write guard is released.

pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod cleanup;
pub mod engagement;
pub mod event;
pub mod ledger;
pub mod merge;
pub mod recovery;
pub mod store;
pub mod visibility;

#[cfg(test)]
pub(crate) mod testing;

use serde_json::Value as JsonValue;

use storehub_core::AggregateId;
use storehub_events::{Event, EventBus, EventEnvelope};

use crate::event::MarketEvent;
use crate::store::MarketStore;

pub use cart_store::CartView;
pub use checkout::OrderView;
pub use engagement::ReservationListView;

/// The marketplace engine: shared state plus the post-commit event bus.
///
/// Generic over the bus so tests and production wiring can differ; the store
/// is always the in-process reference implementation.
pub struct Market<B> {
    store: MarketStore,
    bus: B,
}

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(bus: B) -> Self {
        Self {
            store: MarketStore::new(),
            bus,
        }
    }

    pub(crate) fn store(&self) -> &MarketStore {
        &self.store
    }

    /// Publish a post-commit integration event.
    ///
    /// State has already committed by the time this runs, so a publish
    /// failure is logged and swallowed rather than bubbled into the
    /// operation result; consumers are expected to tolerate gaps the same
    /// way they tolerate duplicates.
    pub(crate) fn publish(
        &self,
        subject_id: AggregateId,
        subject_type: &'static str,
        event: &MarketEvent,
    ) {
        let payload = match serde_json::to_value(event) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(event_type = event.event_type(), "event serialization failed: {e}");
                return;
            }
        };

        let envelope = EventEnvelope::new(
            uuid::Uuid::now_v7(),
            subject_id,
            subject_type,
            event.event_type(),
            payload,
        );

        if let Err(e) = self.bus.publish(envelope) {
            tracing::warn!(event_type = event.event_type(), "event publication failed: {e:?}");
        }
    }
}
