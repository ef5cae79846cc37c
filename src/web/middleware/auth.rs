//! Authorization middleware.
//!
//! Runs before every protected route: validates the presented token,
//! re-resolves the principal's role from the store, and publishes a typed
//! [`AccountInfo`] into the request extensions. The role is looked up
//! fresh on each request, so a role edit takes effect immediately even
//! for tokens issued earlier.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{AccountInfo, AuthError, Principal};
use crate::store::StoreError;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "token";

/// Authenticate and authorize one request, then run the inner handler.
///
/// Any failing step terminates the request immediately; there are no
/// retries here.
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_request(&request).ok_or(AuthError::MissingToken)?;
    let claims = state.codec.validate(&token)?;
    let principal = claims.principal()?;

    let role = match principal {
        Principal::User(id) => state.roles.role_by_user_id(id).await,
        Principal::Service(id) => state.roles.role_by_service_id(id).await,
    }
    .map_err(|e| {
        if let StoreError::Unavailable(msg) = &e {
            tracing::warn!("role lookup failed: {msg}");
        }
        AuthError::NoRole
    })?;

    request.extensions_mut().insert(AccountInfo { principal, role });

    Ok(next.run(request).await)
}

/// The token string from the bearer header, falling back to the cookie.
fn token_from_request(request: &Request) -> Option<String> {
    let headers = request.headers();

    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let token = value.strip_prefix("Bearer ").unwrap_or(value);
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AccountInfo
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccountInfo>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("missing account info"))
    }
}
