use axum::{Router, routing::get};

pub mod carts;
pub mod catalog;
pub mod common;
pub mod favorites;
pub mod orders;
pub mod reservations;
pub mod reviews;
pub mod system;

/// Routes that need no buyer identity (storefront browsing, health).
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/catalog", catalog::public_router())
}

/// Router for all identity-scoped endpoints (user token or session key).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/catalog", catalog::router())
        .nest("/cart", carts::router())
        .nest("/orders", orders::router())
        .nest("/favorites", favorites::router())
        .nest("/reviews", reviews::router())
        .nest("/reservations", reservations::router())
}
