//! Per-route permission gate.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::{AccountInfo, AuthError, PermissionSet};
use crate::web::error::ApiError;

/// Reject the request unless the resolved role holds every permission in
/// `required`.
///
/// The gate reads the [`AccountInfo`] published by the authorization
/// middleware; reaching it without that middleware is a wiring bug and is
/// refused rather than allowed through. The first missing permission is
/// named in the response.
pub async fn permission_gate(
    required: PermissionSet,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(info) = request.extensions().get::<AccountInfo>() else {
        tracing::error!("permission gate reached without account info");
        return Err(ApiError::unauthorized("missing account info"));
    };

    if let Some(missing) = info.role.permissions.first_missing(required) {
        return Err(AuthError::MissingPermission(missing).into());
    }

    Ok(next.run(request).await)
}
