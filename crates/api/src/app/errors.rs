use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storehub_core::DomainError;

/// Map a domain failure onto the wire contract.
///
/// Stock failures carry structured detail (product, requested vs. available)
/// so the storefront can render an actionable message instead of a generic
/// "something went wrong".
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvalidQuantity(qty) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_quantity",
            format!("quantity must be positive, got {qty}"),
        ),
        DomainError::InsufficientStock {
            product_id,
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": format!(
                    "insufficient stock for product {product_id}: requested {requested}, available {available}"
                ),
                "product_id": product_id.to_string(),
                "requested": requested,
                "available": available,
            })),
        )
            .into_response(),
        DomainError::ProductUnavailable(product_id) => (
            StatusCode::GONE,
            axum::Json(json!({
                "error": "product_unavailable",
                "message": format!("product {product_id} is unavailable"),
                "product_id": product_id.to_string(),
            })),
        )
            .into_response(),
        DomainError::CheckoutFailed { product_id, reason } => {
            let detail = checkout_reason_detail(&reason);
            (
                StatusCode::CONFLICT,
                axum::Json(json!({
                    "error": "checkout_failed",
                    "message": format!("checkout failed on product {product_id}: {reason}"),
                    "product_id": product_id.to_string(),
                    "reason": detail,
                })),
            )
                .into_response()
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

fn checkout_reason_detail(reason: &DomainError) -> serde_json::Value {
    match reason {
        DomainError::InsufficientStock {
            product_id,
            requested,
            available,
        } => json!({
            "error": "insufficient_stock",
            "product_id": product_id.to_string(),
            "requested": requested,
            "available": available,
        }),
        other => json!({ "error": "other", "message": other.to_string() }),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
