use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use storehub_auth::JwtValidator;
use storehub_core::{BuyerIdentity, SessionKey};

use crate::context::IdentityContext;

/// Header carrying the anonymous session key for guests.
pub const SESSION_KEY_HEADER: &str = "x-session-key";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the buyer identity for every identity-scoped route.
///
/// A bearer JWT wins (authenticated user); otherwise the session-key header
/// identifies a guest. A request with neither has no cart to talk about and
/// is rejected outright.
pub async fn identity_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let identity = resolve_identity(&state, req.headers())?;

    req.extensions_mut().insert(IdentityContext::new(identity));

    Ok(next.run(req).await)
}

fn resolve_identity(state: &AuthState, headers: &HeaderMap) -> Result<BuyerIdentity, StatusCode> {
    if let Some(token) = bearer_token(headers)? {
        let claims = state
            .jwt
            .validate(token, Utc::now())
            .map_err(|_e| StatusCode::UNAUTHORIZED)?;
        return Ok(BuyerIdentity::User(claims.sub));
    }

    if let Some(raw) = headers.get(SESSION_KEY_HEADER) {
        let raw = raw.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;
        let key = SessionKey::parse(raw).map_err(|_| StatusCode::UNAUTHORIZED)?;
        return Ok(BuyerIdentity::Guest(key));
    }

    Err(StatusCode::UNAUTHORIZED)
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, StatusCode> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?
        .trim();

    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Some(token))
}
