use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use storehub_catalog::ProductId;
use storehub_core::AggregateId;
use storehub_engagement::ReviewId;

use crate::app::routes::common::require_user;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_review))
        .route("/:id/approve", post(approve_review))
}

/// Leave a rating. Guests may review too; the review simply carries no user.
pub async fn add_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::CreateReviewRequest>,
) -> axum::response::Response {
    let agg: AggregateId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.market().add_review(
        identity.user_id(),
        ProductId::new(agg),
        body.rating,
        &body.text,
    ) {
        Ok(review_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "review_id": review_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Moderation hook for the admin collaborator.
pub async fn approve_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_user(&identity) {
        return resp;
    }
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid review id"),
    };

    match services.market().approve_review(ReviewId::new(agg)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
