use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_catalog::ProductId;
use storehub_core::{AggregateId, DomainError, DomainResult, Entity};

use crate::cart::CartId;

/// Cart line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(pub AggregateId);

impl CartItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A (cart, product) pairing.
///
/// The unit price is snapshotted when the line is created; later price edits
/// on the product do not reach lines already in carts. At most one line per
/// (cart, product) — adds accumulate into the existing row.
///
/// `is_deleted_backup` marks a recovery placeholder: the product was
/// soft-deleted while this cart held it, and the line is kept as an undo
/// record instead of being purged. Backup lines are never purchasable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    id: CartItemId,
    cart_id: CartId,
    product_id: ProductId,
    quantity: i64,
    /// Unit price snapshot in smallest currency unit (e.g., cents).
    price_cents: u64,
    is_deleted_backup: bool,
    created_at: DateTime<Utc>,
}

impl CartItem {
    /// New shopping line. Rejects non-positive quantities.
    pub fn new(
        id: CartItemId,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
        price_cents: u64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(quantity));
        }
        Ok(Self {
            id,
            cart_id,
            product_id,
            quantity,
            price_cents,
            is_deleted_backup: false,
            created_at,
        })
    }

    /// New recovery placeholder (quantity 1), created for the deleting owner
    /// when their cart held no line for the product.
    pub fn backup(
        id: CartItemId,
        cart_id: CartId,
        product_id: ProductId,
        price_cents: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            cart_id,
            product_id,
            quantity: 1,
            price_cents,
            is_deleted_backup: true,
            created_at,
        }
    }

    pub fn id_typed(&self) -> CartItemId {
        self.id
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price snapshot in smallest currency unit (e.g., cents).
    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn is_deleted_backup(&self) -> bool {
        self.is_deleted_backup
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Backup lines represent restorable deletions, not shopping intent.
    pub fn is_purchasable(&self) -> bool {
        !self.is_deleted_backup
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.price_cents * self.quantity as u64
    }

    /// Accumulate more units into this line. The price snapshot is
    /// deliberately not refreshed.
    pub fn add_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(quantity));
        }
        self.quantity += quantity;
        Ok(())
    }

    /// Replace the quantity in place. Quantities below one are a removal,
    /// which is the caller's job, not a line mutation.
    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity < 1 {
            return Err(DomainError::invalid_quantity(quantity));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Convert this active line into a recovery placeholder.
    pub fn mark_backup(&mut self) {
        self.is_deleted_backup = true;
    }

    /// Turn a recovery placeholder back into a shopping line. Only valid
    /// once the product is alive again; adds to a restored product reclaim
    /// the row because a cart holds at most one line per product.
    pub fn reclaim(&mut self) {
        self.is_deleted_backup = false;
    }

    /// Refresh the price snapshot. Only the soft-delete path does this, so
    /// the undo record reflects the price at deletion time.
    pub fn refresh_price(&mut self, price_cents: u64) {
        self.price_cents = price_cents;
    }

    /// Re-parent this line onto another cart (session merge).
    pub fn reassign(&mut self, cart_id: CartId) {
        self.cart_id = cart_id;
    }
}

impl Entity for CartItem {
    type Id = CartItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Cart total over purchasable lines, in smallest currency unit. Backup
/// lines are excluded: they are undo records, not pending purchases.
pub fn total_cents<'a>(items: impl Iterator<Item = &'a CartItem>) -> u64 {
    items
        .filter(|it| it.is_purchasable())
        .map(|it| it.subtotal_cents())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (CartItemId, CartId, ProductId) {
        (
            CartItemId::new(AggregateId::new()),
            CartId::new(AggregateId::new()),
            ProductId::new(AggregateId::new()),
        )
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let (id, cart_id, product_id) = ids();
        let err = CartItem::new(id, cart_id, product_id, 0, 100, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::InvalidQuantity(0));
    }

    #[test]
    fn accumulation_keeps_the_original_price_snapshot() {
        let (id, cart_id, product_id) = ids();
        let mut item = CartItem::new(id, cart_id, product_id, 2, 1000, Utc::now()).unwrap();

        item.add_quantity(3).unwrap();

        assert_eq!(item.quantity(), 5);
        assert_eq!(item.price_cents(), 1000);
        assert_eq!(item.subtotal_cents(), 5000);
    }

    #[test]
    fn set_quantity_below_one_is_rejected() {
        let (id, cart_id, product_id) = ids();
        let mut item = CartItem::new(id, cart_id, product_id, 2, 1000, Utc::now()).unwrap();
        assert!(item.set_quantity(0).is_err());
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn backup_line_is_not_purchasable() {
        let (id, cart_id, product_id) = ids();
        let item = CartItem::backup(id, cart_id, product_id, 500, Utc::now());
        assert!(!item.is_purchasable());
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn total_excludes_backup_lines() {
        let (id, cart_id, product_id) = ids();
        let shopping = CartItem::new(id, cart_id, product_id, 2, 1000, Utc::now()).unwrap();
        let backup = CartItem::backup(
            CartItemId::new(AggregateId::new()),
            cart_id,
            ProductId::new(AggregateId::new()),
            500,
            Utc::now(),
        );

        let total = total_cents([&shopping, &backup].into_iter());
        assert_eq!(total, 2000);
    }
}
