use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use storehub_catalog::{CategoryId, ProductId};
use storehub_core::AggregateId;

use crate::app::routes::common::require_user;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

/// Storefront browsing: no identity required.
pub fn public_router() -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:slug", get(get_product))
        .route("/products/:slug/reviews", get(list_product_reviews))
        .route("/categories", get(list_categories))
}

/// Seller-side catalog management.
pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:slug", delete(soft_delete_product))
        .route("/products/:slug/publish", post(publish_product))
        .route("/categories", post(create_category))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.market().list_published() {
        Ok(products) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    match services.market().get_product_by_slug(&slug) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_product_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    let product = match services.market().get_product_by_slug(&slug) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.market().list_approved_reviews(product.id_typed()) {
        Ok(reviews) => {
            let items = reviews.iter().map(dto::review_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.market().list_categories() {
        Ok(categories) => {
            let items = categories.iter().map(dto::category_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let owner = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let category_id = match body.category_id.as_deref() {
        Some(raw) => match raw.parse::<AggregateId>() {
            Ok(id) => Some(CategoryId::new(id)),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid category id",
                );
            }
        },
        None => None,
    };

    match services.market().create_product(
        owner,
        &body.name,
        &body.description,
        body.price_cents,
        body.stock,
        category_id,
        body.publish,
    ) {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn publish_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let actor = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.market().publish_product(actor, ProductId::new(agg)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Soft delete: the listing disappears but carts that held it keep a
/// recovery placeholder.
pub async fn soft_delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let actor = match require_user(&identity) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let agg: AggregateId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.market().soft_delete(actor, ProductId::new(agg)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_user(&identity) {
        return resp;
    }

    match services.market().create_category(&body.name) {
        Ok(category) => (StatusCode::CREATED, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
