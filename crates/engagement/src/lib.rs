//! `storehub-engagement` — buyer/product side entities.
//!
//! Favorites, reviews, and reservations carry their own small uniqueness and
//! ownership constraints but never touch stock, carts, or visibility.

pub mod favorite;
pub mod reservation;
pub mod review;

pub use favorite::{Favorite, FavoriteId};
pub use reservation::{Reservation, ReservationId, ReservationStatus};
pub use review::{Review, ReviewId};
