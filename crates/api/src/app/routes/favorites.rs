use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use storehub_catalog::ProductId;
use storehub_core::AggregateId;

use crate::app::routes::common::require_user;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_favorite).get(list_favorites))
        .route("/:product_id", delete(remove_favorite))
}

pub async fn add_favorite(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::AddFavoriteRequest>,
) -> axum::response::Response {
    let user = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let agg: AggregateId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.market().add_favorite(user, ProductId::new(agg)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_favorite(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let user = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let agg: AggregateId = match product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.market().remove_favorite(user, ProductId::new(agg)) {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({ "removed": removed })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_favorites(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let user = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match services.market().list_favorites(user) {
        Ok(products) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
