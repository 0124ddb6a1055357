use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_catalog::ProductId;
use storehub_core::{AggregateId, DomainError, DomainResult, Entity, UserId};

/// Reservation identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub AggregateId);

impl ReservationId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Cancelled,
}

/// A time-window booking on a product. Does not touch stock or visibility;
/// confirmation happens out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    user: Option<UserId>,
    product_id: ProductId,
    reserved_from: DateTime<Utc>,
    reserved_to: DateTime<Utc>,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        id: ReservationId,
        user: Option<UserId>,
        product_id: ProductId,
        reserved_from: DateTime<Utc>,
        reserved_to: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if reserved_from >= reserved_to {
            return Err(DomainError::validation(
                "reservation window must start before it ends",
            ));
        }
        Ok(Self {
            id,
            user,
            product_id,
            reserved_from,
            reserved_to,
            status: ReservationStatus::Active,
            created_at,
        })
    }

    pub fn id_typed(&self) -> ReservationId {
        self.id
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn reserved_from(&self) -> DateTime<Utc> {
        self.reserved_from
    }

    pub fn reserved_to(&self) -> DateTime<Utc> {
        self.reserved_to
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Cancel the booking. Only the reserving user may do this; anonymous
    /// reservations cannot be cancelled through the API.
    pub fn cancel(&mut self, actor: UserId) -> DomainResult<()> {
        if self.user != Some(actor) {
            return Err(DomainError::Unauthorized);
        }
        self.status = ReservationStatus::Cancelled;
        Ok(())
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now + Duration::hours(1), now + Duration::hours(3))
    }

    #[test]
    fn rejects_inverted_window() {
        let (from, to) = window();
        let err = Reservation::new(
            ReservationId::new(AggregateId::new()),
            None,
            ProductId::new(AggregateId::new()),
            to,
            from,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_the_reserving_user_can_cancel() {
        let (from, to) = window();
        let owner = UserId::new();
        let mut res = Reservation::new(
            ReservationId::new(AggregateId::new()),
            Some(owner),
            ProductId::new(AggregateId::new()),
            from,
            to,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(res.cancel(UserId::new()).unwrap_err(), DomainError::Unauthorized);
        assert!(res.is_active());

        res.cancel(owner).unwrap();
        assert!(!res.is_active());
    }
}
