//! Error taxonomy for authentication and authorization.
//!
//! Bad-username and bad-password failures share one variant, and every
//! token failure collapses into `InvalidToken`, so responses never reveal
//! which check rejected the request.

use thiserror::Error;

use super::permission::Permission;

/// Authentication/authorization failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No token in the Authorization header or cookie.
    #[error("no token in header or cookie")]
    MissingToken,

    /// Malformed, expired, or signature-mismatched token.
    #[error("invalid token")]
    InvalidToken,

    /// Token carries an account type outside the known kinds.
    #[error("invalid account type")]
    UnknownAccountType,

    /// The principal has no role assigned.
    #[error("account has no role")]
    NoRole,

    /// A required permission is not in the resolved role.
    #[error("missing permission {0}")]
    MissingPermission(Permission),

    /// The credential or role store could not be reached.
    #[error("store unavailable: {0}")]
    Store(String),

    /// Signing or key-derivation failure, including RNG exhaustion.
    #[error("crypto failure: {0}")]
    Crypto(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_permission_names_the_permission() {
        let err = AuthError::MissingPermission(Permission::DataDelete);
        assert_eq!(err.to_string(), "missing permission data_delete");
    }

    #[test]
    fn test_credential_failures_are_indistinguishable() {
        // One message for both unknown-user and wrong-password paths.
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "invalid username or password"
        );
    }
}
