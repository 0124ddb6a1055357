use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_catalog::ProductId;
use storehub_core::{AggregateId, Entity, UserId};

/// Favorite identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(pub AggregateId);

impl FavoriteId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A user's bookmark on a product. Unique per (user, product); the store
/// enforces that by treating a second add as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    id: FavoriteId,
    user: UserId,
    product_id: ProductId,
    created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(
        id: FavoriteId,
        user: UserId,
        product_id: ProductId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            product_id,
            created_at,
        }
    }

    pub fn id_typed(&self) -> FavoriteId {
        self.id
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Favorite {
    type Id = FavoriteId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
