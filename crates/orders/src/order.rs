use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_catalog::ProductId;
use storehub_core::{AggregateId, DomainError, DomainResult, Entity, UserId};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemId(pub AggregateId);

impl OrderItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
///
/// Checkout only ever creates `New`; every other status is set by the
/// payment/fulfilment collaborators through [`Order::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Processing,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the payment/fulfilment flow may move an order from `self`
    /// to `to`.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (New, Processing)
                | (New, Paid)
                | (New, Cancelled)
                | (Processing, Paid)
                | (Processing, Cancelled)
                | (Paid, Shipped)
        )
    }
}

/// Immutable snapshot of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    /// Buyer account; guest purchases carry no user.
    user: Option<UserId>,
    status: OrderStatus,
    /// Aggregate total in smallest currency unit (e.g., cents).
    total_cents: u64,
    created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: OrderId,
        user: Option<UserId>,
        total_cents: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            status: OrderStatus::New,
            total_cents,
            created_at,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Aggregate total in smallest currency unit (e.g., cents).
    pub fn total_cents(&self) -> u64 {
        self.total_cents
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a status transition requested by an external collaborator.
    pub fn transition(&mut self, to: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition(to) {
            return Err(DomainError::invariant(format!(
                "order cannot move from {} to {}",
                self.status.as_str(),
                to.as_str()
            )));
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One line of an order: name/price/quantity copied at commit time so the
/// snapshot survives later product edits. The product reference is only a
/// back-link and may dangle once the product is purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    order_id: OrderId,
    product_id: Option<ProductId>,
    name: String,
    /// Unit price in smallest currency unit (e.g., cents).
    price_cents: u64,
    quantity: i64,
}

impl OrderItem {
    pub fn new(
        id: OrderItemId,
        order_id: OrderId,
        product_id: Option<ProductId>,
        name: impl Into<String>,
        price_cents: u64,
        quantity: i64,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(quantity));
        }
        Ok(Self {
            id,
            order_id,
            product_id,
            name: name.into(),
            price_cents,
            quantity,
        })
    }

    pub fn id_typed(&self) -> OrderItemId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price in smallest currency unit (e.g., cents).
    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.price_cents * self.quantity as u64
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order() -> Order {
        Order::new(
            OrderId::new(AggregateId::new()),
            Some(UserId::new()),
            5000,
            Utc::now(),
        )
    }

    #[test]
    fn checkout_creates_new_orders() {
        let order = test_order();
        assert_eq!(order.status(), OrderStatus::New);
    }

    #[test]
    fn happy_path_new_processing_paid_shipped() {
        let mut order = test_order();
        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::Paid).unwrap();
        order.transition(OrderStatus::Shipped).unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);
    }

    #[test]
    fn direct_payment_skips_processing() {
        let mut order = test_order();
        order.transition(OrderStatus::Paid).unwrap();
        assert_eq!(order.status(), OrderStatus::Paid);
    }

    #[test]
    fn cancel_is_only_reachable_before_payment() {
        let mut order = test_order();
        order.transition(OrderStatus::Cancelled).unwrap();

        let mut paid = test_order();
        paid.transition(OrderStatus::Paid).unwrap();
        let err = paid.transition(OrderStatus::Cancelled).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn shipped_is_terminal() {
        let mut order = test_order();
        order.transition(OrderStatus::Paid).unwrap();
        order.transition(OrderStatus::Shipped).unwrap();

        for to in [
            OrderStatus::New,
            OrderStatus::Processing,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            assert!(order.clone().transition(to).is_err());
        }
    }

    #[test]
    fn cannot_ship_unpaid_order() {
        let mut order = test_order();
        let err = order.transition(OrderStatus::Shipped).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn order_item_rejects_non_positive_quantity() {
        let err = OrderItem::new(
            OrderItemId::new(AggregateId::new()),
            OrderId::new(AggregateId::new()),
            None,
            "Bike",
            1000,
            0,
        )
        .unwrap_err();
        assert_eq!(err, DomainError::InvalidQuantity(0));
    }

    #[test]
    fn order_item_subtotal() {
        let item = OrderItem::new(
            OrderItemId::new(AggregateId::new()),
            OrderId::new(AggregateId::new()),
            Some(ProductId::new(AggregateId::new())),
            "Bike",
            1000,
            3,
        )
        .unwrap();
        assert_eq!(item.subtotal_cents(), 3000);
    }
}
