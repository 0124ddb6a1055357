use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_core::{AggregateId, BuyerIdentity, Entity};

/// Cart identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub AggregateId);

impl CartId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A buyer's cart.
///
/// Exactly one active cart per identity: user carts persist indefinitely,
/// session carts live until merged at login or reclaimed by the retention
/// sweep. Created lazily on the first cart-mutating action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    owner: BuyerIdentity,
    created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: CartId, owner: BuyerIdentity, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            created_at,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn owner(&self) -> &BuyerIdentity {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Session carts are subject to the retention sweep; user carts are not.
    pub fn is_session_cart(&self) -> bool {
        self.owner.is_guest()
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
