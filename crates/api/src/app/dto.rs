use axum::http::StatusCode;
use serde::Deserialize;

use storehub_carts::CartItem;
use storehub_catalog::{Category, Product};
use storehub_engagement::{Reservation, Review};
use storehub_market::{CartView, OrderView, ReservationListView};
use storehub_orders::OrderStatus;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u64,
    pub stock: i64,
    pub category_id: Option<String>,
    /// Fresh listings go live immediately unless the owner keeps a draft.
    #[serde(default = "default_true")]
    pub publish: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct BuyNowRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub product_id: String,
    pub reserved_from: String, // RFC3339
    pub reserved_to: String,   // RFC3339
}

pub fn parse_order_status(s: &str) -> Result<OrderStatus, axum::response::Response> {
    match s {
        "new" => Ok(OrderStatus::New),
        "processing" => Ok(OrderStatus::Processing),
        "paid" => Ok(OrderStatus::Paid),
        "shipped" => Ok(OrderStatus::Shipped),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: new, processing, paid, shipped, cancelled",
        )),
    }
}

pub fn parse_rfc3339(
    s: &str,
    field: &'static str,
) -> Result<chrono::DateTime<chrono::Utc>, axum::response::Response> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_timestamp",
                format!("{field} must be RFC3339: {e}"),
            )
        })
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id_typed().to_string(),
        "slug": p.slug(),
        "name": p.name(),
        "description": p.description(),
        "price_cents": p.price_cents(),
        "stock": p.stock(),
        "is_published": p.is_published(),
        "category_id": p.category_id().to_string(),
        "created_at": p.created_at().to_rfc3339(),
    })
}

pub fn category_to_json(c: &Category) -> serde_json::Value {
    serde_json::json!({
        "id": c.id_typed().to_string(),
        "name": c.name(),
        "slug": c.slug(),
    })
}

pub fn cart_item_to_json(it: &CartItem) -> serde_json::Value {
    serde_json::json!({
        "id": it.id_typed().to_string(),
        "product_id": it.product_id().to_string(),
        "quantity": it.quantity(),
        "price_cents": it.price_cents(),
        "subtotal_cents": it.subtotal_cents(),
        "is_deleted_backup": it.is_deleted_backup(),
    })
}

pub fn cart_view_to_json(view: &CartView) -> serde_json::Value {
    serde_json::json!({
        "cart_id": view.cart_id.to_string(),
        "items": view.items.iter().map(cart_item_to_json).collect::<Vec<_>>(),
        "total_cents": view.total_cents,
        "has_purchasable": view.has_purchasable,
    })
}

pub fn order_view_to_json(view: &OrderView) -> serde_json::Value {
    serde_json::json!({
        "id": view.order.id_typed().to_string(),
        "status": view.order.status().as_str(),
        "total_cents": view.order.total_cents(),
        "created_at": view.order.created_at().to_rfc3339(),
        "items": view.items.iter().map(|it| serde_json::json!({
            "id": it.id_typed().to_string(),
            "product_id": it.product_id().map(|id| id.to_string()),
            "name": it.name(),
            "price_cents": it.price_cents(),
            "quantity": it.quantity(),
            "subtotal_cents": it.subtotal_cents(),
        })).collect::<Vec<_>>(),
    })
}

pub fn review_to_json(r: &Review) -> serde_json::Value {
    serde_json::json!({
        "id": r.id_typed().to_string(),
        "product_id": r.product_id().to_string(),
        "rating": r.rating(),
        "text": r.text(),
        "created_at": r.created_at().to_rfc3339(),
    })
}

pub fn reservation_to_json(r: &Reservation) -> serde_json::Value {
    serde_json::json!({
        "id": r.id_typed().to_string(),
        "product_id": r.product_id().to_string(),
        "reserved_from": r.reserved_from().to_rfc3339(),
        "reserved_to": r.reserved_to().to_rfc3339(),
        "created_at": r.created_at().to_rfc3339(),
    })
}

pub fn reservation_list_to_json(view: &ReservationListView) -> serde_json::Value {
    serde_json::json!({
        "items": view.reservations.iter().map(reservation_to_json).collect::<Vec<_>>(),
        "total_cents": view.total_cents,
    })
}
