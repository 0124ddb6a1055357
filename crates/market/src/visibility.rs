//! Visibility coordinator: the one rule deciding public listing state.
//!
//! A product is publicly visible iff it is not soft-deleted and not currently
//! held by any cart (and has stock left). The rule only decides; the actual
//! flag writes are delegated to the ledger inside the same write transaction.
//!
//! Every add/remove path funnels through these two functions; a failure
//! surfaces as a typed result instead of leaving stock and visibility out of
//! step.

use storehub_catalog::ProductId;
use storehub_core::DomainResult;

use crate::ledger;
use crate::store::MarketState;

/// On add-to-cart: hide the product from the public listing unconditionally.
///
/// First come, first cart — once a buyer holds a unit of interest, other
/// buyers no longer see the listing, even when stock would cover them all.
/// This is a pessimistic reservation-via-visibility scheme, not per-unit
/// locking; overselling is prevented by the stock decrement, visibility is
/// only the UX signal.
pub(crate) fn hide_on_add(state: &mut MarketState, product_id: ProductId) -> DomainResult<()> {
    ledger::force_unpublish(state, product_id)?;
    tracing::debug!(%product_id, "product hidden while held by a cart");
    Ok(())
}

/// After a cart line for `product_id` went away: restore the public listing
/// if — and only if — no cart line anywhere still references the product.
///
/// Restoration is suppressed when the product was soft-deleted in the
/// meantime (soft delete outranks cart-emptiness) and when stock has run out
/// (zero-stock products stay off the listing). Returns whether the product
/// became visible again.
pub(crate) fn restore_if_unreferenced(
    state: &mut MarketState,
    product_id: ProductId,
) -> DomainResult<bool> {
    if state.any_cart_references(product_id) {
        return Ok(false);
    }

    let product = state.product(product_id)?;
    if product.stock() == 0 {
        return Ok(false);
    }

    let restored = ledger::restore_visibility(state, product_id)?;
    if restored {
        tracing::debug!(%product_id, "product restored to the public listing");
    }
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MarketStore;
    use chrono::Utc;
    use storehub_carts::{CartId, CartItem, CartItemId};
    use storehub_catalog::{CategoryId, Product};
    use storehub_core::AggregateId;

    fn seed_product(store: &MarketStore, stock: i64, published: bool) -> ProductId {
        let product_id = ProductId::new(AggregateId::new());
        store
            .write(|state| {
                let mut p = Product::new(
                    product_id,
                    CategoryId::new(AggregateId::new()),
                    None,
                    "Desk",
                    "desk",
                    "",
                    9900,
                    stock,
                    Utc::now(),
                )?;
                if published {
                    p.publish()?;
                }
                state.insert_product(p);
                Ok(())
            })
            .unwrap();
        product_id
    }

    fn seed_line(store: &MarketStore, product_id: ProductId) -> CartItemId {
        let item_id = CartItemId::new(AggregateId::new());
        store
            .write(|state| {
                let item = CartItem::new(
                    item_id,
                    CartId::new(AggregateId::new()),
                    product_id,
                    1,
                    9900,
                    Utc::now(),
                )?;
                state.insert_cart_item(item);
                Ok(())
            })
            .unwrap();
        item_id
    }

    fn is_published(store: &MarketStore, product_id: ProductId) -> bool {
        store
            .read(|state| state.product(product_id).unwrap().is_published())
            .unwrap()
    }

    #[test]
    fn hide_on_add_is_unconditional() {
        let store = MarketStore::new();
        let product_id = seed_product(&store, 10, true);

        store.write(|state| hide_on_add(state, product_id)).unwrap();
        assert!(!is_published(&store, product_id));
    }

    #[test]
    fn restore_skipped_while_any_cart_holds_the_product() {
        let store = MarketStore::new();
        let product_id = seed_product(&store, 10, true);
        seed_line(&store, product_id);

        store.write(|state| hide_on_add(state, product_id)).unwrap();
        let restored = store
            .write(|state| restore_if_unreferenced(state, product_id))
            .unwrap();

        assert!(!restored);
        assert!(!is_published(&store, product_id));
    }

    #[test]
    fn restore_happens_once_the_last_line_is_gone() {
        let store = MarketStore::new();
        let product_id = seed_product(&store, 10, true);
        let item_id = seed_line(&store, product_id);

        store.write(|state| hide_on_add(state, product_id)).unwrap();
        store
            .write(|state| {
                state.remove_cart_item(item_id);
                restore_if_unreferenced(state, product_id)
            })
            .unwrap();

        assert!(is_published(&store, product_id));
    }

    #[test]
    fn soft_delete_outranks_cart_emptiness() {
        let store = MarketStore::new();
        let product_id = seed_product(&store, 10, true);

        store
            .write(|state| {
                state.product_mut(product_id)?.soft_delete();
                restore_if_unreferenced(state, product_id)
            })
            .unwrap();

        assert!(!is_published(&store, product_id));
    }

    #[test]
    fn zero_stock_products_stay_hidden() {
        let store = MarketStore::new();
        let product_id = seed_product(&store, 0, false);

        let restored = store
            .write(|state| restore_if_unreferenced(state, product_id))
            .unwrap();

        assert!(!restored);
        assert!(!is_published(&store, product_id));
    }
}
