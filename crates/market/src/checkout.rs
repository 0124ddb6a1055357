//! Checkout engine: converting cart lines into immutable orders.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value as JsonValue;

use storehub_carts::total_cents;
use storehub_catalog::ProductId;
use storehub_core::{AggregateId, BuyerIdentity, DomainError, DomainResult};
use storehub_events::{EventBus, EventEnvelope};
use storehub_orders::{Order, OrderId, OrderItem, OrderItemId, OrderStatus};

use crate::cart_store::resolve_cart_id;
use crate::event::{MarketEvent, OrderPlaced, OrderStatusChanged};
use crate::{Market, ledger, visibility};

/// An order with its line snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Convert the identity's cart into an order.
    ///
    /// All-or-nothing: every purchasable line is validated against current
    /// stock before anything is mutated, so the first shortfall aborts with
    /// `CheckoutFailed` leaving stock, cart, and orders exactly as they
    /// were. Backup lines are recovery placeholders and take no part in the
    /// purchase; they survive the cart clearing.
    pub fn checkout(&self, identity: &BuyerIdentity) -> DomainResult<OrderView> {
        let (view, event) = self.store().write(|state| {
            let cart_id = resolve_cart_id(state, identity);

            let lines: Vec<storehub_carts::CartItem> = state
                .items_in_cart(cart_id)
                .into_iter()
                .filter(|it| it.is_purchasable())
                .cloned()
                .collect();

            if lines.is_empty() {
                return Err(DomainError::validation("cart has no purchasable items"));
            }

            let order_total = total_cents(lines.iter());

            // Validation pass: nothing below may fail once mutation starts.
            for line in &lines {
                let product_id = line.product_id();
                let product = state
                    .product(product_id)
                    .map_err(|e| DomainError::checkout_failed(product_id.0, e))?;
                product
                    .check_decrement(line.quantity())
                    .map_err(|e| DomainError::checkout_failed(product_id.0, e))?;
            }

            // Commit pass.
            let now = Utc::now();
            let order_id = OrderId::new(AggregateId::new());
            let order = Order::new(order_id, identity.user_id(), order_total, now);
            state.insert_order(order.clone());

            let mut order_items = Vec::with_capacity(lines.len());
            for line in &lines {
                let product_id = line.product_id();
                let name = state.product(product_id)?.name().to_string();

                ledger::decrement_stock(state, product_id, line.quantity())?;

                let item = OrderItem::new(
                    OrderItemId::new(AggregateId::new()),
                    order_id,
                    Some(product_id),
                    name,
                    line.price_cents(),
                    line.quantity(),
                )?;
                state.insert_order_item(item.clone());
                order_items.push(item);

                state.remove_cart_item(line.id_typed());
            }

            // The bought products are no longer held by this cart; put the
            // ones with stock left and no other holders back on the listing.
            let mut seen: Vec<ProductId> = Vec::new();
            for line in &lines {
                let product_id = line.product_id();
                if !seen.contains(&product_id) {
                    seen.push(product_id);
                    visibility::restore_if_unreferenced(state, product_id)?;
                }
            }

            tracing::info!(owner = %identity, %order_id, total_cents = order_total, "checkout committed");

            let event = MarketEvent::OrderPlaced(OrderPlaced {
                order_id,
                user: identity.user_id(),
                total_cents: order_total,
                line_count: order_items.len(),
                occurred_at: now,
            });

            Ok((
                OrderView {
                    order,
                    items: order_items,
                },
                event,
            ))
        })?;

        self.publish(view.order.id_typed().0, "order", &event);
        Ok(view)
    }

    /// Single-line purchase that bypasses the cart entirely, with the same
    /// stock-decrement and atomicity rules as checkout.
    pub fn buy_now(
        &self,
        identity: &BuyerIdentity,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<OrderView> {
        let (view, event) = self.store().write(|state| {
            let product = state.product(product_id)?;
            if product.is_deleted() {
                return Err(DomainError::product_unavailable(product_id.0));
            }
            if quantity <= 0 {
                return Err(DomainError::invalid_quantity(quantity));
            }

            let name = product.name().to_string();
            let price_cents = product.price_cents();

            ledger::decrement_stock(state, product_id, quantity)?;

            let now = Utc::now();
            let order_id = OrderId::new(AggregateId::new());
            let total = price_cents * quantity as u64;
            let order = Order::new(order_id, identity.user_id(), total, now);
            state.insert_order(order.clone());

            let item = OrderItem::new(
                OrderItemId::new(AggregateId::new()),
                order_id,
                Some(product_id),
                name,
                price_cents,
                quantity,
            )?;
            state.insert_order_item(item.clone());

            tracing::info!(owner = %identity, %order_id, %product_id, quantity, "buy-now committed");

            let event = MarketEvent::OrderPlaced(OrderPlaced {
                order_id,
                user: identity.user_id(),
                total_cents: total,
                line_count: 1,
                occurred_at: now,
            });

            Ok((
                OrderView {
                    order,
                    items: vec![item],
                },
                event,
            ))
        })?;

        self.publish(view.order.id_typed().0, "order", &event);
        Ok(view)
    }

    /// Fetch an order snapshot (confirmation page, notification consumer).
    pub fn get_order(&self, order_id: OrderId) -> DomainResult<OrderView> {
        self.store().read(|state| {
            let order = state.order(order_id)?.clone();
            let items = state
                .items_in_order(order_id)
                .into_iter()
                .cloned()
                .collect();
            Ok(OrderView { order, items })
        })?
    }

    /// Status transition driven by the payment/fulfilment collaborator.
    pub fn set_order_status(
        &self,
        order_id: OrderId,
        to: OrderStatus,
    ) -> DomainResult<OrderView> {
        let (view, event) = self.store().write(|state| {
            let order = state.order_mut(order_id)?;
            let from = order.status();
            order.transition(to)?;
            let order = order.clone();

            tracing::info!(%order_id, from = from.as_str(), to = to.as_str(), "order status changed");

            let items = state
                .items_in_order(order_id)
                .into_iter()
                .cloned()
                .collect();

            let event = MarketEvent::OrderStatusChanged(OrderStatusChanged {
                order_id,
                from,
                to,
                occurred_at: Utc::now(),
            });

            Ok((OrderView { order, items }, event))
        })?;

        self.publish(order_id.0, "order", &event);
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{guest, market_with_events, seed_product, seeded_market, user};
    use chrono::Utc;
    use storehub_carts::{CartItem, CartItemId};

    #[test]
    fn checkout_snapshots_lines_and_clears_the_cart() {
        let (market, product_id) = seeded_market(10, 1000);
        let buyer = user();

        market.add_item(&buyer, product_id, 2).unwrap();
        let view = market.checkout(&buyer).unwrap();

        assert_eq!(view.order.status(), OrderStatus::New);
        assert_eq!(view.order.total_cents(), 2000);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity(), 2);

        let cart = market.view_cart(&buyer).unwrap();
        assert!(cart.items.is_empty());

        let stock = market
            .store()
            .read(|state| state.product(product_id).unwrap().stock())
            .unwrap();
        assert_eq!(stock, 8);
    }

    #[test]
    fn checkout_excludes_backup_lines_from_order_and_total() {
        let (market, product_id) = seeded_market(10, 1000);
        let deleted_product = seed_product(&market, 5, 500);
        let buyer = user();

        market.add_item(&buyer, product_id, 2).unwrap();

        // A recovery placeholder sits in the same cart.
        let cart_id = market.resolve_cart(&buyer).unwrap();
        market
            .store()
            .write(|state| {
                state.product_mut(deleted_product)?.soft_delete();
                state.insert_cart_item(CartItem::backup(
                    CartItemId::new(storehub_core::AggregateId::new()),
                    cart_id,
                    deleted_product,
                    500,
                    Utc::now(),
                ));
                Ok(())
            })
            .unwrap();

        let view = market.checkout(&buyer).unwrap();

        assert_eq!(view.order.total_cents(), 2000);
        assert_eq!(view.items.len(), 1);

        // The backup line survives the clearing; the deleted product's stock
        // is untouched.
        let cart = market.view_cart(&buyer).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert!(cart.items[0].is_deleted_backup());
        let stock = market
            .store()
            .read(|state| state.product(deleted_product).unwrap().stock())
            .unwrap();
        assert_eq!(stock, 5);
    }

    #[test]
    fn failed_line_aborts_the_whole_checkout() {
        let (market, plenty) = seeded_market(5, 1000);
        let scarce = seed_product(&market, 1, 2000);
        let buyer = user();

        market.add_item(&buyer, plenty, 2).unwrap();
        market.add_item(&buyer, scarce, 3).unwrap();

        let err = market.checkout(&buyer).unwrap_err();
        match err {
            DomainError::CheckoutFailed { product_id, reason } => {
                assert_eq!(product_id, scarce.0);
                assert!(matches!(
                    *reason,
                    DomainError::InsufficientStock {
                        requested: 3,
                        available: 1,
                        ..
                    }
                ));
            }
            other => panic!("expected CheckoutFailed, got {other:?}"),
        }

        // Nothing persisted: stock untouched, cart unmodified, no orders.
        market
            .store()
            .read(|state| {
                assert_eq!(state.product(plenty).unwrap().stock(), 5);
                assert_eq!(state.product(scarce).unwrap().stock(), 1);
                assert_eq!(state.orders().count(), 0);
            })
            .unwrap();

        let cart = market.view_cart(&buyer).unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let (market, _product) = seeded_market(5, 1000);
        let err = market.checkout(&user()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn checkout_restores_visibility_when_stock_remains() {
        let (market, product_id) = seeded_market(5, 1000);
        let buyer = user();

        market.add_item(&buyer, product_id, 2).unwrap();
        market.checkout(&buyer).unwrap();

        market
            .store()
            .read(|state| {
                let p = state.product(product_id).unwrap();
                assert_eq!(p.stock(), 3);
                assert!(p.is_published());
            })
            .unwrap();
    }

    #[test]
    fn checkout_of_the_last_units_leaves_the_product_hidden() {
        let (market, product_id) = seeded_market(2, 1000);
        let buyer = user();

        market.add_item(&buyer, product_id, 2).unwrap();
        market.checkout(&buyer).unwrap();

        market
            .store()
            .read(|state| {
                let p = state.product(product_id).unwrap();
                assert_eq!(p.stock(), 0);
                assert!(!p.is_published());
            })
            .unwrap();
    }

    #[test]
    fn checkout_publishes_order_placed() {
        let (market, sub) = market_with_events();
        let product_id = seed_product(&market, 5, 1000);
        let buyer = user();

        market.add_item(&buyer, product_id, 1).unwrap();
        let view = market.checkout(&buyer).unwrap();

        let envelope = sub.try_recv().unwrap();
        assert_eq!(envelope.event_type(), "order.placed");
        assert_eq!(envelope.subject_id(), view.order.id_typed().0);
    }

    #[test]
    fn buy_now_works_for_guests_and_decrements_stock() {
        let (market, product_id) = seeded_market(3, 1500);
        let buyer = guest("guest-42");

        let view = market.buy_now(&buyer, product_id, 2).unwrap();

        assert_eq!(view.order.user(), None);
        assert_eq!(view.order.total_cents(), 3000);

        market
            .store()
            .read(|state| {
                assert_eq!(state.product(product_id).unwrap().stock(), 1);
            })
            .unwrap();
    }

    #[test]
    fn buy_now_shortfall_persists_nothing() {
        let (market, product_id) = seeded_market(1, 1500);

        let err = market.buy_now(&user(), product_id, 2).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        market
            .store()
            .read(|state| {
                assert_eq!(state.product(product_id).unwrap().stock(), 1);
                assert_eq!(state.orders().count(), 0);
            })
            .unwrap();
    }

    #[test]
    fn buy_now_rejects_bad_quantity_and_deleted_products() {
        let (market, product_id) = seeded_market(5, 1500);

        assert_eq!(
            market.buy_now(&user(), product_id, 0).unwrap_err(),
            DomainError::InvalidQuantity(0)
        );

        market
            .store()
            .write(|state| {
                state.product_mut(product_id)?.soft_delete();
                Ok(())
            })
            .unwrap();

        assert_eq!(
            market.buy_now(&user(), product_id, 1).unwrap_err(),
            DomainError::ProductUnavailable(product_id.0)
        );
    }

    #[test]
    fn payment_collaborator_can_walk_the_status_machine() {
        let (market, sub) = market_with_events();
        let product_id = seed_product(&market, 5, 1000);
        let buyer = user();
        let view = market.buy_now(&buyer, product_id, 1).unwrap();
        let order_id = view.order.id_typed();
        let _placed = sub.try_recv().unwrap();

        market
            .set_order_status(order_id, OrderStatus::Processing)
            .unwrap();
        market.set_order_status(order_id, OrderStatus::Paid).unwrap();
        let view = market
            .set_order_status(order_id, OrderStatus::Shipped)
            .unwrap();
        assert_eq!(view.order.status(), OrderStatus::Shipped);

        let envelope = sub.try_recv().unwrap();
        assert_eq!(envelope.event_type(), "order.status_changed");

        let err = market
            .set_order_status(order_id, OrderStatus::Cancelled)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
