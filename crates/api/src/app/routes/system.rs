use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use storehub_core::BuyerIdentity;

use crate::context::IdentityContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(identity): Extension<IdentityContext>) -> impl IntoResponse {
    let (kind, id) = match identity.identity() {
        BuyerIdentity::User(user_id) => ("user", user_id.to_string()),
        BuyerIdentity::Guest(key) => ("guest", key.to_string()),
    };
    Json(serde_json::json!({
        "kind": kind,
        "id": id,
    }))
}
