//! Domain error model.

use thiserror::Error;

use crate::id::AggregateId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere. Every
/// variant a buyer can trigger carries enough detail to render an actionable
/// message (which product, requested vs. available quantity).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A quantity was non-positive where a positive amount is required.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A stock decrement exceeded what is on hand. Nothing was mutated.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: AggregateId,
        requested: i64,
        available: i64,
    },

    /// The product is soft-deleted and cannot be bought or carted.
    #[error("product {0} is unavailable")]
    ProductUnavailable(AggregateId),

    /// Checkout aborted; wraps the first line failure so the caller can see
    /// which product blocked the order.
    #[error("checkout failed on product {product_id}: {reason}")]
    CheckoutFailed {
        product_id: AggregateId,
        reason: Box<DomainError>,
    },

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. stale version / lost storage race).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_quantity(qty: i64) -> Self {
        Self::InvalidQuantity(qty)
    }

    pub fn insufficient_stock(product_id: AggregateId, requested: i64, available: i64) -> Self {
        Self::InsufficientStock {
            product_id,
            requested,
            available,
        }
    }

    pub fn product_unavailable(product_id: AggregateId) -> Self {
        Self::ProductUnavailable(product_id)
    }

    pub fn checkout_failed(product_id: AggregateId, reason: DomainError) -> Self {
        Self::CheckoutFailed {
            product_id,
            reason: Box::new(reason),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
