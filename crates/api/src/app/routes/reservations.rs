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
use storehub_engagement::ReservationId;

use crate::app::routes::common::require_user;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_reservation).get(list_reservations))
        .route("/:id/cancel", post(cancel_reservation))
}

pub async fn create_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::CreateReservationRequest>,
) -> axum::response::Response {
    let agg: AggregateId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };
    let reserved_from = match dto::parse_rfc3339(&body.reserved_from, "reserved_from") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let reserved_to = match dto::parse_rfc3339(&body.reserved_to, "reserved_to") {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    match services.market().create_reservation(
        identity.user_id(),
        ProductId::new(agg),
        reserved_from,
        reserved_to,
    ) {
        Ok(reservation_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "reservation_id": reservation_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn cancel_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid reservation id"),
    };

    match services
        .market()
        .cancel_reservation(user, ReservationId::new(agg))
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_reservations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let user = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match services.market().list_reservations(user) {
        Ok(view) => (StatusCode::OK, Json(dto::reservation_list_to_json(&view))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
