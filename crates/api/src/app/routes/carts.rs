use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
};

use storehub_carts::CartItemId;
use storehub_catalog::ProductId;
use storehub_core::{AggregateId, SessionKey};

use crate::app::routes::common::require_user;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;
use crate::middleware::SESSION_KEY_HEADER;

pub fn router() -> Router {
    Router::new()
        .route("/", get(view_cart))
        .route("/items", post(add_item))
        .route("/items/:id", patch(set_quantity).delete(remove_item))
        .route("/items/:id/restore", post(restore_product))
        .route("/merge", post(merge))
}

pub async fn view_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    match services.market().view_cart(identity.identity()) {
        Ok(view) => (StatusCode::OK, Json(dto::cart_view_to_json(&view))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::AddItemRequest>,
) -> axum::response::Response {
    let agg: AggregateId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services
        .market()
        .add_item(identity.identity(), ProductId::new(agg), body.quantity)
    {
        Ok(item_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "item_id": item_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services
        .market()
        .remove_item(identity.identity(), CartItemId::new(agg))
    {
        Ok(restored) => (
            StatusCode::OK,
            Json(serde_json::json!({ "visibility_restored": restored })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetQuantityRequest>,
) -> axum::response::Response {
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services
        .market()
        .set_quantity(identity.identity(), CartItemId::new(agg), body.quantity)
    {
        Ok(restored) => (
            StatusCode::OK,
            Json(serde_json::json!({ "visibility_restored": restored })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Undo a soft delete from the backup line this cart holds for it.
pub async fn restore_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services
        .market()
        .restore_product(identity.identity(), CartItemId::new(agg))
    {
        Ok(product_id) => (
            StatusCode::OK,
            Json(serde_json::json!({ "product_id": product_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Fold the guest cart into the just-authenticated user's cart.
///
/// Needs both identities at once: the bearer token names the user, the
/// session-key header names the guest cart being absorbed.
pub async fn merge(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    headers: HeaderMap,
) -> axum::response::Response {
    let user = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let Some(raw) = headers.get(SESSION_KEY_HEADER) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_session_key",
            "merge requires the session-key header naming the guest cart",
        );
    };
    let session_key = match raw.to_str().ok().and_then(|s| SessionKey::parse(s).ok()) {
        Some(key) => key,
        None => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid session key");
        }
    };

    match services.market().merge_session_cart(&session_key, user) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
