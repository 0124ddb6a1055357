//! Soft-delete recovery: hiding a listing without losing the way back.

use chrono::Utc;
use serde_json::Value as JsonValue;

use storehub_carts::{CartItem, CartItemId};
use storehub_catalog::ProductId;
use storehub_core::{AggregateId, BuyerIdentity, DomainError, DomainResult, UserId};
use storehub_events::{EventBus, EventEnvelope};

use crate::Market;
use crate::cart_store::resolve_cart_id;
use crate::event::{MarketEvent, ProductRestored, ProductSoftDeleted};

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Soft-delete a listing.
    ///
    /// The product disappears from the public listing immediately, but every
    /// cart that held it keeps its line as a recovery placeholder instead of
    /// losing it. The deleting owner's own cart additionally gets a
    /// quantity-one placeholder if it held nothing — that is the undo
    /// record [`Market::restore_product`] works from.
    pub fn soft_delete(&self, actor: UserId, product_id: ProductId) -> DomainResult<()> {
        let event = self.store().write(|state| {
            let product = state.product(product_id)?;
            if !product.owned_by(actor) {
                return Err(DomainError::Unauthorized);
            }
            let price_cents = product.price_cents();

            state.product_mut(product_id)?.soft_delete();

            // Every active line anywhere becomes a recovery placeholder.
            let line_ids = state.item_ids_for_product(product_id);
            let backup_carts = line_ids.len();
            for item_id in &line_ids {
                if let Some(item) = state.cart_item_mut(*item_id) {
                    item.mark_backup();
                }
            }

            // The actor's cart: refresh the undo record's price, or create
            // one if the cart held nothing for this product.
            let actor_cart_id = resolve_cart_id(state, &BuyerIdentity::User(actor));
            match state.find_cart_item_id(actor_cart_id, product_id) {
                Some(item_id) => {
                    if let Some(item) = state.cart_item_mut(item_id) {
                        item.refresh_price(price_cents);
                    }
                }
                None => {
                    state.insert_cart_item(CartItem::backup(
                        CartItemId::new(AggregateId::new()),
                        actor_cart_id,
                        product_id,
                        price_cents,
                        Utc::now(),
                    ));
                }
            }

            tracing::info!(%product_id, actor = %actor, backup_carts, "product soft-deleted");

            Ok(MarketEvent::ProductSoftDeleted(ProductSoftDeleted {
                product_id,
                backup_carts,
                occurred_at: Utc::now(),
            }))
        })?;

        self.publish(product_id.0, "product", &event);
        Ok(())
    }

    /// Undelete a product from a recovery placeholder in the caller's cart.
    ///
    /// Clears the soft-delete flag and consumes the placeholder. The product
    /// does **not** return to the public listing here — deletion hides
    /// eagerly, restoration only un-hides the deletion flag, and publication
    /// stays a separate owner action.
    pub fn restore_product(
        &self,
        identity: &BuyerIdentity,
        item_id: CartItemId,
    ) -> DomainResult<ProductId> {
        let (product_id, event) = self.store().write(|state| {
            let cart_id = state
                .cart_id_for(identity)
                .ok_or(DomainError::NotFound)?;

            let item = state
                .cart_item(item_id)
                .filter(|it| it.cart_id() == cart_id && it.is_deleted_backup())
                .ok_or(DomainError::NotFound)?;
            let product_id = item.product_id();

            state.product_mut(product_id)?.restore_deleted();
            state.remove_cart_item(item_id);

            tracing::info!(%product_id, owner = %identity, "product restored from cart backup");

            Ok((
                product_id,
                MarketEvent::ProductRestored(ProductRestored {
                    product_id,
                    occurred_at: Utc::now(),
                }),
            ))
        })?;

        self.publish(product_id.0, "product", &event);
        Ok(product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{market, seed_owned_product, user};

    #[test]
    fn soft_delete_marks_every_holding_cart_and_leaves_an_undo_record() {
        let m = market();
        let owner = UserId::new();
        let product = seed_owned_product(&m, owner, 10, 1000);

        let alice = user();
        let bob = user();
        m.add_item(&alice, product, 2).unwrap();
        m.add_item(&bob, product, 1).unwrap();

        m.soft_delete(owner, product).unwrap();

        m.store()
            .read(|state| {
                let p = state.product(product).unwrap();
                assert!(p.is_deleted());
                assert!(!p.is_published());
            })
            .unwrap();

        // Both buyers keep their lines, flagged as backups, quantities intact.
        let a = m.view_cart(&alice).unwrap();
        assert_eq!(a.items.len(), 1);
        assert!(a.items[0].is_deleted_backup());
        assert_eq!(a.items[0].quantity(), 2);

        let b = m.view_cart(&bob).unwrap();
        assert!(b.items[0].is_deleted_backup());

        // The owner's cart held nothing, so it gained a quantity-one record.
        let o = m.view_cart(&BuyerIdentity::User(owner)).unwrap();
        assert_eq!(o.items.len(), 1);
        assert!(o.items[0].is_deleted_backup());
        assert_eq!(o.items[0].quantity(), 1);
    }

    #[test]
    fn soft_delete_is_owner_only() {
        let m = market();
        let owner = UserId::new();
        let product = seed_owned_product(&m, owner, 10, 1000);

        let err = m.soft_delete(UserId::new(), product).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);

        m.store()
            .read(|state| assert!(!state.product(product).unwrap().is_deleted()))
            .unwrap();
    }

    #[test]
    fn restore_round_trip_leaves_other_backups_and_publication_alone() {
        let m = market();
        let owner = UserId::new();
        let product = seed_owned_product(&m, owner, 10, 1000);

        let alice = user();
        let bob = user();
        m.add_item(&alice, product, 1).unwrap();
        m.add_item(&bob, product, 1).unwrap();

        m.soft_delete(owner, product).unwrap();

        let alice_item = m.view_cart(&alice).unwrap().items[0].id_typed();
        let restored = m.restore_product(&alice, alice_item).unwrap();
        assert_eq!(restored, product);

        m.store()
            .read(|state| {
                let p = state.product(product).unwrap();
                assert!(!p.is_deleted());
                // Publication is a separate owner action.
                assert!(!p.is_published());
            })
            .unwrap();

        // Alice's placeholder is consumed; Bob's is untouched.
        assert!(m.view_cart(&alice).unwrap().items.is_empty());
        let b = m.view_cart(&bob).unwrap();
        assert_eq!(b.items.len(), 1);
        assert!(b.items[0].is_deleted_backup());
    }

    #[test]
    fn restore_requires_a_backup_line_in_the_callers_cart() {
        let m = market();
        let owner = UserId::new();
        let product = seed_owned_product(&m, owner, 10, 1000);

        let alice = user();
        let item_id = m.add_item(&alice, product, 1).unwrap();

        // An active (non-backup) line cannot be "restored".
        assert_eq!(
            m.restore_product(&alice, item_id).unwrap_err(),
            DomainError::NotFound
        );

        m.soft_delete(owner, product).unwrap();

        // Nor can someone else's backup line.
        let stranger = user();
        m.resolve_cart(&stranger).unwrap();
        assert_eq!(
            m.restore_product(&stranger, item_id).unwrap_err(),
            DomainError::NotFound
        );
    }

    #[test]
    fn soft_delete_refreshes_the_owners_existing_line_price() {
        let m = market();
        let owner = UserId::new();
        let product = seed_owned_product(&m, owner, 10, 1000);
        let owner_identity = BuyerIdentity::User(owner);

        m.add_item(&owner_identity, product, 2).unwrap();

        // Price changes between add and delete; the undo record should carry
        // the price at deletion time.
        m.store()
            .write(|state| {
                let p = state.product(product)?.clone();
                let mut replacement = storehub_catalog::Product::new(
                    product,
                    p.category_id(),
                    p.owner(),
                    p.name(),
                    p.slug(),
                    p.description(),
                    2500,
                    p.stock(),
                    p.created_at(),
                )?;
                replacement.publish()?;
                state.insert_product(replacement);
                Ok(())
            })
            .unwrap();

        m.soft_delete(owner, product).unwrap();

        let cart = m.view_cart(&owner_identity).unwrap();
        assert_eq!(cart.items[0].price_cents(), 2500);
        assert_eq!(cart.items[0].quantity(), 2);
    }
}
