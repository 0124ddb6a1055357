use serde::{Deserialize, Serialize};

use crate::id::{SessionKey, UserId};

/// Who the current buyer is: an authenticated user or an anonymous session.
///
/// Every cart-mutating operation takes this explicitly (no ambient "current
/// cart" state); it is the key under which the Cart Store resolves a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuyerIdentity {
    User(UserId),
    Guest(SessionKey),
}

impl BuyerIdentity {
    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            BuyerIdentity::User(id) => Some(*id),
            BuyerIdentity::Guest(_) => None,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, BuyerIdentity::Guest(_))
    }
}

impl crate::ValueObject for BuyerIdentity {}

impl core::fmt::Display for BuyerIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuyerIdentity::User(id) => write!(f, "user:{id}"),
            BuyerIdentity::Guest(key) => write!(f, "session:{key}"),
        }
    }
}
