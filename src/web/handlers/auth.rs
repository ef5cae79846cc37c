//! Authentication handlers: login, logout, service-token refresh, and
//! account introspection.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::auth::{
    AccountInfo, AuthError, Claims, PasswordHasher, Principal, SignedToken, TokenCodec,
};
use crate::config::AuthConfig;
use crate::store::{CredentialStore, RoleStore, StoreError};
use crate::web::dto::{LoginRequest, TokenResponse};
use crate::web::error::ApiError;
use crate::web::middleware::AUTH_COOKIE;

/// Application state shared across handlers and middleware.
pub struct AppState {
    /// Token signer/validator.
    pub codec: TokenCodec,
    /// Password hasher.
    pub hasher: PasswordHasher,
    /// Credential lookup for login.
    pub credentials: Arc<dyn CredentialStore>,
    /// Role resolution for authorization.
    pub roles: Arc<dyn RoleStore>,
    /// Issuer written into claims.
    pub issuer: String,
    /// Token lifetime for user sessions.
    pub session_ttl: Duration,
    /// Token lifetime for service accounts.
    pub service_ttl: Duration,
}

impl AppState {
    /// Build application state from the auth configuration and stores.
    pub fn new(
        config: &AuthConfig,
        credentials: Arc<dyn CredentialStore>,
        roles: Arc<dyn RoleStore>,
    ) -> Self {
        Self {
            codec: TokenCodec::new(config.jwt_secret.as_bytes(), config.leeway_secs),
            hasher: PasswordHasher::new(config.argon2.clone()),
            credentials,
            roles,
            issuer: config.issuer.clone(),
            session_ttl: Duration::hours(config.session_ttl_hours),
            service_ttl: Duration::days(config.service_ttl_days),
        }
    }
}

/// POST /login - verify credentials and issue a session token.
///
/// Unknown username and wrong password produce the same 401 so the
/// response never reveals whether an account exists. The token is set as
/// an HttpOnly+Secure cookie and returned in the body for bearer use; no
/// server-side session record is created.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let (user_id, record) = match state
        .credentials
        .user_credentials_by_username(&request.username)
        .await
    {
        Ok(found) => found,
        Err(StoreError::NotFound) => return Err(AuthError::InvalidCredentials.into()),
        Err(StoreError::Unavailable(msg)) => return Err(AuthError::Store(msg).into()),
    };

    // Argon2 is deliberately expensive; keep it off the async workers.
    let hasher = state.hasher.clone();
    let password = request.password;
    let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &record))
        .await
        .map_err(|e| ApiError::internal(format!("hash task failed: {e}")))?;

    if !verified {
        return Err(AuthError::InvalidCredentials.into());
    }

    let claims = Claims::new(
        Principal::User(user_id),
        &state.issuer,
        &request.username,
        Utc::now(),
        state.session_ttl,
    );
    let signed = state.codec.sign(&claims)?;

    let jar = jar.add(auth_cookie(&signed));
    Ok((
        jar,
        Json(TokenResponse {
            token: signed.value,
            expires_at: signed.expires_at,
        }),
    ))
}

/// DELETE /logout - clear the session cookie.
///
/// Tokens are stateless, so a bearer token captured before logout keeps
/// validating until its own expiry. That is the documented limit of
/// cookie clearing, not something this handler can revoke.
pub async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    let mut cookie = Cookie::new(AUTH_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.make_removal();

    (StatusCode::NO_CONTENT, jar.add(cookie))
}

/// POST /accounts/services/{id}/token - issue a fresh token for a
/// service account.
///
/// Gated by `service_account_update`. The previous token is not
/// invalidated and stays valid until its natural expiry; with no
/// revocation store that overlap is an accepted risk.
pub async fn refresh_service_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<TokenResponse>, ApiError> {
    // A service account without a role cannot authenticate; treat it as
    // absent rather than minting a useless token.
    match state.roles.role_by_service_id(id).await {
        Ok(_) => {}
        Err(StoreError::NotFound) => {
            return Err(ApiError::not_found("service account not found"))
        }
        Err(StoreError::Unavailable(msg)) => return Err(AuthError::Store(msg).into()),
    }

    let claims = Claims::new(
        Principal::Service(id),
        &state.issuer,
        &id.to_string(),
        Utc::now(),
        state.service_ttl,
    );
    let signed = state.codec.sign(&claims)?;

    Ok(Json(TokenResponse {
        token: signed.value,
        expires_at: signed.expires_at,
    }))
}

/// GET /me - the caller's resolved principal and role.
pub async fn me(info: AccountInfo) -> Json<AccountInfo> {
    Json(info)
}

fn auth_cookie(token: &SignedToken) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token.value.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    if let Ok(expires) = time::OffsetDateTime::from_unix_timestamp(token.expires_at.timestamp()) {
        cookie.set_expires(expires);
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_auth_cookie_attributes() {
        let token = SignedToken {
            value: "header.payload.signature".to_string(),
            expires_at: DateTime::from_timestamp(1_700_086_400, 0).unwrap(),
        };
        let cookie = auth_cookie(&token);

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "header.payload.signature");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        let expires = cookie.expires_datetime().unwrap();
        assert_eq!(expires.unix_timestamp(), 1_700_086_400);
    }
}
