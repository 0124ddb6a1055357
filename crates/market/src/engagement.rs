//! Engagement services: favorites, reviews, reservations.
//!
//! Deliberately boring: simple uniqueness/ownership constraints, no
//! interaction with stock, carts, or visibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use storehub_catalog::{Product, ProductId};
use storehub_core::{AggregateId, DomainError, DomainResult, UserId};
use storehub_engagement::{
    Favorite, FavoriteId, Reservation, ReservationId, Review, ReviewId,
};
use storehub_events::{EventBus, EventEnvelope};

use crate::Market;

/// A user's reservations plus the summed price of the reserved products.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationListView {
    pub reservations: Vec<Reservation>,
    /// Sum of current product prices, in smallest currency unit.
    pub total_cents: u64,
}

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    // ── favorites ───────────────────────────────────────────────────────

    /// Bookmark a product. Adding twice is a no-op (unique per
    /// user+product).
    pub fn add_favorite(&self, user: UserId, product_id: ProductId) -> DomainResult<()> {
        self.store().write(|state| {
            state.product(product_id)?;
            let exists = state
                .favorites()
                .any(|f| f.user() == user && f.product_id() == product_id);
            if !exists {
                state.insert_favorite(Favorite::new(
                    FavoriteId::new(AggregateId::new()),
                    user,
                    product_id,
                    Utc::now(),
                ));
            }
            Ok(())
        })
    }

    /// Drop a bookmark. Returns whether one existed.
    pub fn remove_favorite(&self, user: UserId, product_id: ProductId) -> DomainResult<bool> {
        self.store().write(|state| {
            let ids: Vec<FavoriteId> = state
                .favorites()
                .filter(|f| f.user() == user && f.product_id() == product_id)
                .map(|f| f.id_typed())
                .collect();
            state.remove_favorites(&ids);
            Ok(!ids.is_empty())
        })
    }

    /// The user's bookmarked products.
    pub fn list_favorites(&self, user: UserId) -> DomainResult<Vec<Product>> {
        self.store().read(|state| {
            state
                .favorites()
                .filter(|f| f.user() == user)
                .filter_map(|f| state.products().find(|p| p.id_typed() == f.product_id()))
                .cloned()
                .collect()
        })
    }

    // ── reviews ─────────────────────────────────────────────────────────

    /// Leave a rating. Anonymous reviews are allowed; everything starts
    /// unapproved.
    pub fn add_review(
        &self,
        user: Option<UserId>,
        product_id: ProductId,
        rating: u8,
        text: &str,
    ) -> DomainResult<ReviewId> {
        self.store().write(|state| {
            state.product(product_id)?;
            let review = Review::new(
                ReviewId::new(AggregateId::new()),
                user,
                product_id,
                rating,
                text,
                Utc::now(),
            )?;
            let id = review.id_typed();
            state.insert_review(review);
            Ok(id)
        })
    }

    /// Moderation hook for the admin collaborator.
    pub fn approve_review(&self, review_id: ReviewId) -> DomainResult<()> {
        self.store().write(|state| {
            let review = state.review_mut(review_id).ok_or(DomainError::NotFound)?;
            review.approve();
            Ok(())
        })
    }

    /// Approved reviews for a product page, newest first.
    pub fn list_approved_reviews(&self, product_id: ProductId) -> DomainResult<Vec<Review>> {
        self.store().read(|state| {
            let mut reviews: Vec<Review> = state
                .reviews()
                .filter(|r| r.product_id() == product_id && r.is_approved())
                .cloned()
                .collect();
            reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            reviews
        })
    }

    // ── reservations ────────────────────────────────────────────────────

    pub fn create_reservation(
        &self,
        user: Option<UserId>,
        product_id: ProductId,
        reserved_from: DateTime<Utc>,
        reserved_to: DateTime<Utc>,
    ) -> DomainResult<ReservationId> {
        self.store().write(|state| {
            state.product(product_id)?;
            let reservation = Reservation::new(
                ReservationId::new(AggregateId::new()),
                user,
                product_id,
                reserved_from,
                reserved_to,
                Utc::now(),
            )?;
            let id = reservation.id_typed();
            state.insert_reservation(reservation);
            Ok(id)
        })
    }

    pub fn cancel_reservation(
        &self,
        actor: UserId,
        reservation_id: ReservationId,
    ) -> DomainResult<()> {
        self.store().write(|state| {
            let reservation = state
                .reservation_mut(reservation_id)
                .ok_or(DomainError::NotFound)?;
            reservation.cancel(actor)
        })
    }

    /// A user's active reservations, newest first, with the price sum.
    pub fn list_reservations(&self, user: UserId) -> DomainResult<ReservationListView> {
        self.store().read(|state| {
            let mut reservations: Vec<Reservation> = state
                .reservations()
                .filter(|r| r.user() == Some(user) && r.is_active())
                .cloned()
                .collect();
            reservations.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

            let total_cents = reservations
                .iter()
                .filter_map(|r| {
                    state
                        .products()
                        .find(|p| p.id_typed() == r.product_id())
                        .map(|p| p.price_cents())
                })
                .sum();

            ReservationListView {
                reservations,
                total_cents,
            }
        })
    }
}
