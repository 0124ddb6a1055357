use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehub_catalog::ProductId;
use storehub_core::{AggregateId, DomainError, DomainResult, Entity, UserId};

/// Review identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub AggregateId);

impl ReviewId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A rating with optional text. Anonymous reviews are allowed; everything
/// starts unapproved and only moderated reviews reach the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    user: Option<UserId>,
    product_id: ProductId,
    rating: u8,
    text: String,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl Review {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    pub fn new(
        id: ReviewId,
        user: Option<UserId>,
        product_id: ProductId,
        rating: u8,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(DomainError::validation(format!(
                "rating must be between {} and {}",
                Self::MIN_RATING,
                Self::MAX_RATING
            )));
        }
        Ok(Self {
            id,
            user,
            product_id,
            rating,
            text: text.into(),
            approved: false,
            created_at,
        })
    }

    pub fn id_typed(&self) -> ReviewId {
        self.id
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moderation action.
    pub fn approve(&mut self) {
        self.approved = true;
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_rating() {
        for rating in [0u8, 6, 250] {
            let err = Review::new(
                ReviewId::new(AggregateId::new()),
                None,
                ProductId::new(AggregateId::new()),
                rating,
                "",
                Utc::now(),
            )
            .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn starts_unapproved() {
        let mut review = Review::new(
            ReviewId::new(AggregateId::new()),
            Some(UserId::new()),
            ProductId::new(AggregateId::new()),
            5,
            "solid",
            Utc::now(),
        )
        .unwrap();
        assert!(!review.is_approved());

        review.approve();
        assert!(review.is_approved());
    }
}
