use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_core::{AggregateId, DomainError, DomainResult, Entity, UserId};

use crate::category::CategoryId;

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A sellable listing.
///
/// Two flags govern what buyers see: `is_published` (the raw publish flag,
/// toggled by the owner and by cart activity) and `is_deleted` (soft delete;
/// outranks publication everywhere). A product is publicly listed iff it is
/// published and not soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    category_id: CategoryId,
    /// Seller account. Unowned listings are allowed (legacy imports).
    owner: Option<UserId>,
    name: String,
    slug: String,
    description: String,
    /// Price in smallest currency unit (e.g., cents).
    price_cents: u64,
    stock: i64,
    is_published: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProductId,
        category_id: CategoryId,
        owner: Option<UserId>,
        name: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
        price_cents: u64,
        stock: i64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let slug = slug.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if slug.trim().is_empty() {
            return Err(DomainError::validation("product slug cannot be empty"));
        }
        if price_cents == 0 {
            return Err(DomainError::validation("product price must be positive"));
        }
        if stock < 0 {
            return Err(DomainError::validation("product stock cannot be negative"));
        }

        Ok(Self {
            id,
            category_id,
            owner,
            name,
            slug,
            description: description.into(),
            price_cents,
            stock,
            is_published: false,
            is_deleted: false,
            created_at,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Price in smallest currency unit (e.g., cents).
    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the product appears in public listings.
    pub fn is_listed(&self) -> bool {
        self.is_published && !self.is_deleted
    }

    /// Whether the given actor may perform owner-only actions on this
    /// product. Unowned listings accept any actor.
    pub fn owned_by(&self, actor: UserId) -> bool {
        match self.owner {
            Some(owner) => owner == actor,
            None => true,
        }
    }

    /// Remove `quantity` units from stock.
    ///
    /// Rejects the whole amount if it exceeds what is on hand (no partial or
    /// clamped decrement). Hitting zero forces the product off the public
    /// listing; a non-zero remainder leaves the publish flag untouched.
    ///
    /// Callers must hold the store's write lock so the decrement and the
    /// publication side-effect commit together.
    pub fn decrement_stock(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(quantity));
        }
        if quantity > self.stock {
            return Err(DomainError::insufficient_stock(
                self.id.0,
                quantity,
                self.stock,
            ));
        }

        self.stock -= quantity;
        if self.stock == 0 {
            self.is_published = false;
        }
        Ok(())
    }

    /// Check a decrement without applying it. Used by checkout to validate
    /// every line before any mutation.
    pub fn check_decrement(&self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(quantity));
        }
        if quantity > self.stock {
            return Err(DomainError::insufficient_stock(
                self.id.0,
                quantity,
                self.stock,
            ));
        }
        Ok(())
    }

    /// Put the product back on the public listing, unless it is soft-deleted
    /// (soft delete outranks cart-emptiness). Returns whether the flag
    /// actually flipped.
    pub fn restore_visibility(&mut self) -> bool {
        if self.is_deleted || self.is_published {
            return false;
        }
        self.is_published = true;
        true
    }

    /// Take the product off the public listing unconditionally.
    pub fn force_unpublish(&mut self) {
        self.is_published = false;
    }

    /// Explicit owner publication.
    pub fn publish(&mut self) -> DomainResult<()> {
        if self.is_deleted {
            return Err(DomainError::product_unavailable(self.id.0));
        }
        self.is_published = true;
        Ok(())
    }

    /// Hide the product without purging it. Historical order lines keep
    /// referencing it.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.is_published = false;
    }

    /// Undo a soft delete. Publication is deliberately left as-is; putting
    /// the product back on the listing is a separate owner action.
    pub fn restore_deleted(&mut self) {
        self.is_deleted = false;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
