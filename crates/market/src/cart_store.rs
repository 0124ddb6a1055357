//! Cart store: resolving the current cart and mutating its lines.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value as JsonValue;

use storehub_carts::{Cart, CartId, CartItem, CartItemId, total_cents};
use storehub_catalog::ProductId;
use storehub_core::{AggregateId, BuyerIdentity, DomainError, DomainResult};
use storehub_events::{EventBus, EventEnvelope};

use crate::store::MarketState;
use crate::visibility;
use crate::Market;

/// A cart as the buyer sees it: lines, the purchasable total, and whether
/// anything in it can actually be checked out.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub cart_id: CartId,
    pub items: Vec<CartItem>,
    /// Total over purchasable lines, in smallest currency unit.
    pub total_cents: u64,
    pub has_purchasable: bool,
}

/// Get-or-create the cart row for an identity. Idempotent: the same identity
/// always maps to the same cart.
pub(crate) fn resolve_cart_id(state: &mut MarketState, identity: &BuyerIdentity) -> CartId {
    if let Some(cart_id) = state.cart_id_for(identity) {
        return cart_id;
    }
    let cart_id = CartId::new(AggregateId::new());
    state.insert_cart(Cart::new(cart_id, identity.clone(), Utc::now()));
    tracing::debug!(owner = %identity, %cart_id, "cart created");
    cart_id
}

/// Delete a line and run the restore-visibility rule for its product.
/// Returns whether the product became publicly visible again.
pub(crate) fn remove_line_and_restore(
    state: &mut MarketState,
    cart_id: CartId,
    item_id: CartItemId,
) -> DomainResult<bool> {
    let item = state
        .cart_item(item_id)
        .filter(|it| it.cart_id() == cart_id)
        .ok_or(DomainError::NotFound)?;
    let product_id = item.product_id();

    state.remove_cart_item(item_id);
    visibility::restore_if_unreferenced(state, product_id)
}

fn view(state: &MarketState, cart_id: CartId) -> CartView {
    let items: Vec<CartItem> = state
        .items_in_cart(cart_id)
        .into_iter()
        .cloned()
        .collect();
    let total = total_cents(items.iter());
    let has_purchasable = items.iter().any(|it| it.is_purchasable());
    CartView {
        cart_id,
        items,
        total_cents: total,
        has_purchasable,
    }
}

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Resolve the identity's current cart, creating it on first use.
    pub fn resolve_cart(&self, identity: &BuyerIdentity) -> DomainResult<CartId> {
        self.store()
            .write(|state| Ok(resolve_cart_id(state, identity)))
    }

    /// The buyer's cart page: lines, total, purchasability.
    pub fn view_cart(&self, identity: &BuyerIdentity) -> DomainResult<CartView> {
        self.store().write(|state| {
            let cart_id = resolve_cart_id(state, identity);
            Ok(view(state, cart_id))
        })
    }

    /// Cart total over purchasable lines, in smallest currency unit.
    pub fn cart_total(&self, identity: &BuyerIdentity) -> DomainResult<u64> {
        Ok(self.view_cart(identity)?.total_cents)
    }

    /// Put `quantity` units of a product into the identity's cart.
    ///
    /// An existing line for the product accumulates (its price snapshot is
    /// not refreshed); otherwise a new line snapshots the current price. The
    /// product is hidden from the public listing as a side effect: whoever
    /// carts it first reserves the listing.
    pub fn add_item(
        &self,
        identity: &BuyerIdentity,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<CartItemId> {
        self.store().write(|state| {
            let product = state.product(product_id)?;
            if product.is_deleted() {
                return Err(DomainError::product_unavailable(product_id.0));
            }
            if quantity <= 0 {
                return Err(DomainError::invalid_quantity(quantity));
            }
            let price_cents = product.price_cents();

            let cart_id = resolve_cart_id(state, identity);

            let item_id = match state.find_cart_item_id(cart_id, product_id) {
                Some(item_id) => {
                    let item = state
                        .cart_item_mut(item_id)
                        .ok_or(DomainError::NotFound)?;
                    item.add_quantity(quantity)?;
                    // A leftover backup line for a since-restored product
                    // becomes a shopping line again; the cart keeps a single
                    // row per product.
                    if !item.is_purchasable() {
                        item.reclaim();
                    }
                    item_id
                }
                None => {
                    let item_id = CartItemId::new(AggregateId::new());
                    let item = CartItem::new(
                        item_id,
                        cart_id,
                        product_id,
                        quantity,
                        price_cents,
                        Utc::now(),
                    )?;
                    state.insert_cart_item(item);
                    item_id
                }
            };

            visibility::hide_on_add(state, product_id)?;
            tracing::debug!(owner = %identity, %product_id, quantity, "item added to cart");
            Ok(item_id)
        })
    }

    /// Remove a line from the identity's cart. Returns whether the product
    /// came back to the public listing.
    pub fn remove_item(
        &self,
        identity: &BuyerIdentity,
        item_id: CartItemId,
    ) -> DomainResult<bool> {
        self.store().write(|state| {
            let cart_id = resolve_cart_id(state, identity);
            let restored = remove_line_and_restore(state, cart_id, item_id)?;
            tracing::debug!(owner = %identity, %item_id, restored, "item removed from cart");
            Ok(restored)
        })
    }

    /// Change a line's quantity in place; anything below one is a removal
    /// (running the same restore-visibility rule). Returns whether the
    /// product came back to the public listing.
    pub fn set_quantity(
        &self,
        identity: &BuyerIdentity,
        item_id: CartItemId,
        quantity: i64,
    ) -> DomainResult<bool> {
        self.store().write(|state| {
            let cart_id = resolve_cart_id(state, identity);

            if quantity < 1 {
                return remove_line_and_restore(state, cart_id, item_id);
            }

            let item = state
                .cart_item_mut(item_id)
                .filter(|it| it.cart_id() == cart_id)
                .ok_or(DomainError::NotFound)?;
            item.set_quantity(quantity)?;
            Ok(false)
        })
    }
}
