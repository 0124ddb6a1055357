//! Shared fixtures for engine tests.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use storehub_core::{AggregateId, BuyerIdentity, SessionKey, UserId};
use storehub_events::{EventEnvelope, InMemoryEventBus, Subscription};

use crate::Market;

pub(crate) type TestBus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;
pub(crate) type TestMarket = Market<TestBus>;

pub(crate) fn market() -> TestMarket {
    Market::new(Arc::new(InMemoryEventBus::new()))
}

/// Market plus a subscription opened before any operation runs.
pub(crate) fn market_with_events() -> (TestMarket, Subscription<EventEnvelope<JsonValue>>) {
    let bus: TestBus = Arc::new(InMemoryEventBus::new());
    let sub = storehub_events::EventBus::subscribe(&bus);
    (Market::new(bus), sub)
}

pub(crate) fn user() -> BuyerIdentity {
    BuyerIdentity::User(UserId::new())
}

pub(crate) fn guest(key: &str) -> BuyerIdentity {
    BuyerIdentity::Guest(SessionKey::parse(key).unwrap())
}

/// A market with one published product (given stock and unit price).
pub(crate) fn seeded_market(stock: i64, price_cents: u64) -> (TestMarket, storehub_catalog::ProductId) {
    let market = market();
    let product_id = seed_product(&market, stock, price_cents);
    (market, product_id)
}

/// Seed one more published product into an existing market.
pub(crate) fn seed_product(
    market: &TestMarket,
    stock: i64,
    price_cents: u64,
) -> storehub_catalog::ProductId {
    use chrono::Utc;
    use storehub_catalog::{CategoryId, Product, ProductId};

    let product_id = ProductId::new(AggregateId::new());
    market
        .store()
        .write(|state| {
            let mut product = Product::new(
                product_id,
                CategoryId::new(AggregateId::new()),
                None,
                format!("Product {product_id}"),
                format!("product-{product_id}"),
                "",
                price_cents,
                stock,
                Utc::now(),
            )?;
            product.publish()?;
            state.insert_product(product);
            Ok(())
        })
        .unwrap();
    product_id
}

/// Seed a product owned by a specific seller.
pub(crate) fn seed_owned_product(
    market: &TestMarket,
    owner: UserId,
    stock: i64,
    price_cents: u64,
) -> storehub_catalog::ProductId {
    use chrono::Utc;
    use storehub_catalog::{CategoryId, Product, ProductId};

    let product_id = ProductId::new(AggregateId::new());
    market
        .store()
        .write(|state| {
            let mut product = Product::new(
                product_id,
                CategoryId::new(AggregateId::new()),
                Some(owner),
                format!("Product {product_id}"),
                format!("product-{product_id}"),
                "",
                price_cents,
                stock,
                Utc::now(),
            )?;
            product.publish()?;
            state.insert_product(product);
            Ok(())
        })
        .unwrap();
    product_id
}
