//! Inventory ledger: the only writer of stock and automatic publication
//! toggles.
//!
//! These run inside a [`crate::store::MarketStore`] write transaction, so a
//! decrement and its publication side-effect are a single atomic unit — two
//! concurrent checkouts of the last unit serialize on the store lock and the
//! loser sees the shortfall, never a torn read.

use storehub_catalog::ProductId;
use storehub_core::DomainResult;

use crate::store::MarketState;

/// Remove `quantity` units of stock. Fails without mutating when the amount
/// is non-positive or exceeds what is on hand; on success, stock hitting zero
/// forces the product off the public listing.
pub(crate) fn decrement_stock(
    state: &mut MarketState,
    product_id: ProductId,
    quantity: i64,
) -> DomainResult<()> {
    let product = state.product_mut(product_id)?;
    product.decrement_stock(quantity)?;
    tracing::debug!(%product_id, quantity, stock = product.stock(), "stock decremented");
    Ok(())
}

/// Put the product back on the public listing unless it is soft-deleted.
/// Returns whether the flag flipped.
pub(crate) fn restore_visibility(
    state: &mut MarketState,
    product_id: ProductId,
) -> DomainResult<bool> {
    let product = state.product_mut(product_id)?;
    Ok(product.restore_visibility())
}

/// Take the product off the public listing unconditionally.
pub(crate) fn force_unpublish(state: &mut MarketState, product_id: ProductId) -> DomainResult<()> {
    let product = state.product_mut(product_id)?;
    product.force_unpublish();
    Ok(())
}
