use axum::http::StatusCode;

use storehub_core::UserId;

use crate::app::errors;
use crate::context::IdentityContext;

/// Gate for user-only routes: guests carry a cart but cannot sell, moderate,
/// or drive order status.
pub fn require_user(ctx: &IdentityContext) -> Result<UserId, axum::response::Response> {
    ctx.user_id().ok_or_else(|| {
        errors::json_error(
            StatusCode::FORBIDDEN,
            "unauthorized",
            "requires an authenticated user",
        )
    })
}
