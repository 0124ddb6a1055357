//! `storehub-orders` — immutable purchase snapshots.
//!
//! An order is created atomically by the checkout engine and never edited
//! afterwards except for status transitions driven by the payment and
//! fulfilment collaborators.

pub mod order;

pub use order::{Order, OrderId, OrderItem, OrderItemId, OrderStatus};
