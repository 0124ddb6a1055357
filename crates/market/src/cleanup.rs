//! Retention sweep for abandoned session carts.
//!
//! The periodic cleanup collaborator calls this; user carts persist
//! indefinitely and are never touched. Removed lines release their products
//! through the same visibility rule as any other removal, so an abandoned
//! guest cart cannot hide a listing forever.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use storehub_carts::CartId;
use storehub_catalog::ProductId;
use storehub_core::DomainResult;
use storehub_events::{EventBus, EventEnvelope};

use crate::Market;
use crate::visibility;

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Delete session carts created before `cutoff`, with their lines.
    /// Returns how many carts were reclaimed.
    pub fn reclaim_session_carts(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        self.store().write(|state| {
            let stale: Vec<CartId> = state
                .carts()
                .filter(|c| c.is_session_cart() && c.created_at() < cutoff)
                .map(|c| c.id_typed())
                .collect();

            let mut released: Vec<ProductId> = Vec::new();
            for cart_id in &stale {
                for item_id in state.item_ids_in_cart(*cart_id) {
                    if let Some(item) = state.remove_cart_item(item_id) {
                        if !released.contains(&item.product_id()) {
                            released.push(item.product_id());
                        }
                    }
                }
                state.remove_cart(*cart_id);
            }

            for product_id in released {
                // A released product may have been purged meanwhile; skip
                // those rather than aborting the sweep.
                if state.product(product_id).is_ok() {
                    visibility::restore_if_unreferenced(state, product_id)?;
                }
            }

            if !stale.is_empty() {
                tracing::info!(count = stale.len(), "stale session carts reclaimed");
            }
            Ok(stale.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{guest, seeded_market, user};
    use chrono::Duration;

    #[test]
    fn reclaims_only_stale_session_carts() {
        let (m, product) = seeded_market(10, 1000);
        let old_guest = guest("old-guest");
        let user_identity = user();

        m.add_item(&old_guest, product, 1).unwrap();
        m.add_item(&user_identity, product, 1).unwrap();

        // Everything was just created; a cutoff in the past reclaims nothing.
        let count = m
            .reclaim_session_carts(Utc::now() - Duration::days(30))
            .unwrap();
        assert_eq!(count, 0);

        // A future cutoff ages out the guest cart but never the user's.
        let count = m
            .reclaim_session_carts(Utc::now() + Duration::seconds(1))
            .unwrap();
        assert_eq!(count, 1);

        assert!(
            m.store()
                .read(|state| state.cart_id_for(&old_guest))
                .unwrap()
                .is_none()
        );
        assert_eq!(m.view_cart(&user_identity).unwrap().items.len(), 1);
    }

    #[test]
    fn reclaiming_the_last_holder_restores_visibility() {
        let (m, product) = seeded_market(10, 1000);
        let old_guest = guest("lone-guest");

        m.add_item(&old_guest, product, 1).unwrap();

        let published = m
            .store()
            .read(|state| state.product(product).unwrap().is_published())
            .unwrap();
        assert!(!published);

        m.reclaim_session_carts(Utc::now() + Duration::seconds(1))
            .unwrap();

        let published = m
            .store()
            .read(|state| state.product(product).unwrap().is_published())
            .unwrap();
        assert!(published);
    }
}
