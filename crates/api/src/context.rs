use storehub_core::{BuyerIdentity, UserId};

/// Buyer identity for a request, attached by the identity middleware.
///
/// This is immutable and must be present for all identity-scoped routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    identity: BuyerIdentity,
}

impl IdentityContext {
    pub fn new(identity: BuyerIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &BuyerIdentity {
        &self.identity
    }

    /// The authenticated user, for user-only routes.
    pub fn user_id(&self) -> Option<UserId> {
        self.identity.user_id()
    }
}
