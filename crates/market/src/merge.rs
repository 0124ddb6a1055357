//! Session merge: folding a guest cart into a user cart at login.

use serde_json::Value as JsonValue;

use storehub_core::{BuyerIdentity, DomainError, DomainResult, SessionKey, UserId};
use storehub_events::{EventBus, EventEnvelope};

use crate::Market;
use crate::cart_store::resolve_cart_id;

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Fold the session's cart into the user's cart, deduplicating by
    /// product, then destroy the session cart.
    ///
    /// Invoked once, at the moment a session-identified buyer authenticates.
    /// Re-running it is a safe no-op: the first run leaves no session cart
    /// behind. No visibility changes happen here — every product involved is
    /// still held by a cart throughout.
    pub fn merge_session_cart(
        &self,
        session_key: &SessionKey,
        user: UserId,
    ) -> DomainResult<()> {
        self.store().write(|state| {
            let session_owner = BuyerIdentity::Guest(session_key.clone());
            let Some(session_cart_id) = state.cart_id_for(&session_owner) else {
                return Ok(());
            };

            let user_owner = BuyerIdentity::User(user);
            let user_cart_id = resolve_cart_id(state, &user_owner);

            let mut moved = 0usize;
            let mut folded = 0usize;

            for item_id in state.item_ids_in_cart(session_cart_id) {
                let Some(item) = state.cart_item(item_id) else {
                    continue;
                };
                let product_id = item.product_id();
                let quantity = item.quantity();

                match state.find_cart_item_id(user_cart_id, product_id) {
                    Some(existing_id) => {
                        // Same product on both sides: quantities sum, the
                        // user cart's price snapshot wins.
                        let existing = state
                            .cart_item_mut(existing_id)
                            .ok_or(DomainError::NotFound)?;
                        existing.add_quantity(quantity)?;
                        state.remove_cart_item(item_id);
                        folded += 1;
                    }
                    None => {
                        let item = state
                            .cart_item_mut(item_id)
                            .ok_or(DomainError::NotFound)?;
                        item.reassign(user_cart_id);
                        moved += 1;
                    }
                }
            }

            state.remove_cart(session_cart_id);
            tracing::info!(session = %session_key, user = %user, moved, folded, "session cart merged");
            Ok(())
        })
    }
}
