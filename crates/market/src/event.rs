//! Integration events emitted by the engine after commit.
//!
//! Consumers: the order-confirmation mailer reads `order.placed`, payment
//! reconciliation watches `order.status_changed`, and catalog tooling can
//! track soft-delete churn. None of these feed back into engine state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_catalog::ProductId;
use storehub_core::UserId;
use storehub_events::Event;
use storehub_orders::{OrderId, OrderStatus};

/// Event: an order was created by checkout or buy-now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub user: Option<UserId>,
    /// Total in smallest currency unit (e.g., cents).
    pub total_cents: u64,
    pub line_count: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an external collaborator moved an order along its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a listing was soft-deleted by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSoftDeleted {
    pub product_id: ProductId,
    pub backup_carts: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a soft-deleted listing was restored from a cart backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRestored {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    OrderPlaced(OrderPlaced),
    OrderStatusChanged(OrderStatusChanged),
    ProductSoftDeleted(ProductSoftDeleted),
    ProductRestored(ProductRestored),
}

impl Event for MarketEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::OrderPlaced(_) => "order.placed",
            MarketEvent::OrderStatusChanged(_) => "order.status_changed",
            MarketEvent::ProductSoftDeleted(_) => "product.soft_deleted",
            MarketEvent::ProductRestored(_) => "product.restored",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MarketEvent::OrderPlaced(e) => e.occurred_at,
            MarketEvent::OrderStatusChanged(e) => e.occurred_at,
            MarketEvent::ProductSoftDeleted(e) => e.occurred_at,
            MarketEvent::ProductRestored(e) => e.occurred_at,
        }
    }
}
