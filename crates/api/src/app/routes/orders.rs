use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use storehub_catalog::ProductId;
use storehub_core::AggregateId;
use storehub_orders::OrderId;

use crate::app::routes::common::require_user;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/checkout", post(checkout))
        .route("/buy-now", post(buy_now))
        .route("/:id", get(get_order))
        .route("/:id/status", post(set_status))
}

/// Convert the caller's cart into an order. All-or-nothing: a stock
/// shortfall on any line leaves cart, stock, and orders untouched.
pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    match services.market().checkout(identity.identity()) {
        Ok(view) => (StatusCode::CREATED, Json(dto::order_view_to_json(&view))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn buy_now(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::BuyNowRequest>,
) -> axum::response::Response {
    let agg: AggregateId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services
        .market()
        .buy_now(identity.identity(), ProductId::new(agg), body.quantity)
    {
        Ok(view) => (StatusCode::CREATED, Json(dto::order_view_to_json(&view))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.market().get_order(OrderId::new(agg)) {
        // Orders are private: a caller only sees their own. Absent ownership
        // match we answer exactly as if the order did not exist.
        Ok(view) if view.order.user() == identity.user_id() => {
            (StatusCode::OK, Json(dto::order_view_to_json(&view))).into_response()
        }
        Ok(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Status transition surface for the payment/fulfilment collaborator.
pub async fn set_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetOrderStatusRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_user(&identity) {
        return resp;
    }
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };
    let status = match dto::parse_order_status(&body.status) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match services.market().set_order_status(OrderId::new(agg), status) {
        Ok(view) => (StatusCode::OK, Json(dto::order_view_to_json(&view))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
