//! Principals, token claims, and the per-request account view.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::permission::Role;

/// Wire tag for interactive user accounts.
pub const ACCOUNT_TYPE_USER: &str = "user";
/// Wire tag for automated service accounts.
pub const ACCOUNT_TYPE_SERVICE: &str = "service";

/// An authenticated actor: an interactive user or an automated service.
///
/// The wire format keeps a string tag for compatibility, but internally
/// this is a sum type so every dispatch site has to handle each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "accountType", content = "accountID", rename_all = "lowercase")]
pub enum Principal {
    User(u64),
    Service(u64),
}

impl Principal {
    /// The account id, regardless of kind.
    pub fn id(&self) -> u64 {
        match *self {
            Principal::User(id) | Principal::Service(id) => id,
        }
    }

    fn wire_parts(&self) -> (&'static str, u64) {
        match *self {
            Principal::User(id) => (ACCOUNT_TYPE_USER, id),
            Principal::Service(id) => (ACCOUNT_TYPE_SERVICE, id),
        }
    }
}

/// Signed token claims: identity plus validity window.
///
/// Claims never carry the role name or permission list. Roles are
/// re-resolved from the store on every request, so a role edit takes
/// effect on the next request without reissuing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    #[serde(rename = "accountType")]
    pub account_type: String,
    #[serde(rename = "accountID")]
    pub account_id: u64,
}

impl Claims {
    /// Build claims for a principal, valid from `issued_at` for `ttl`.
    pub fn new(
        principal: Principal,
        issuer: &str,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let (account_type, account_id) = principal.wire_parts();
        let iat = issued_at.timestamp();
        Self {
            iss: issuer.to_string(),
            sub: subject.to_string(),
            iat,
            nbf: iat,
            exp: (issued_at + ttl).timestamp(),
            account_type: account_type.to_string(),
            account_id,
        }
    }

    /// The principal these claims identify.
    ///
    /// A tag outside the known kinds is rejected rather than defaulted.
    pub fn principal(&self) -> Result<Principal, AuthError> {
        match self.account_type.as_str() {
            ACCOUNT_TYPE_USER => Ok(Principal::User(self.account_id)),
            ACCOUNT_TYPE_SERVICE => Ok(Principal::Service(self.account_id)),
            _ => Err(AuthError::UnknownAccountType),
        }
    }
}

/// The resolved (principal, role) pair for one request.
///
/// Built by the authorization middleware, published as a typed request
/// extension, and discarded when the request ends. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountInfo {
    #[serde(flatten)]
    pub principal: Principal,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permission::{Permission, PermissionSet};

    fn claims_for(account_type: &str) -> Claims {
        Claims {
            iss: "meshmon-backend".to_string(),
            sub: "alice".to_string(),
            iat: 1_700_000_000,
            nbf: 1_700_000_000,
            exp: 1_700_086_400,
            account_type: account_type.to_string(),
            account_id: 7,
        }
    }

    #[test]
    fn test_new_sets_validity_window() {
        let now = Utc::now();
        let claims = Claims::new(
            Principal::User(3),
            "meshmon-backend",
            "alice",
            now,
            Duration::hours(24),
        );
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp, claims.iat + 24 * 3600);
        assert_eq!(claims.account_type, "user");
        assert_eq!(claims.account_id, 3);
    }

    #[test]
    fn test_principal_dispatch() {
        assert_eq!(claims_for("user").principal(), Ok(Principal::User(7)));
        assert_eq!(claims_for("service").principal(), Ok(Principal::Service(7)));
        assert_eq!(
            claims_for("robot").principal(),
            Err(AuthError::UnknownAccountType)
        );
    }

    #[test]
    fn test_claims_wire_field_names() {
        let json = serde_json::to_value(claims_for("service")).unwrap();
        assert_eq!(json["accountType"], "service");
        assert_eq!(json["accountID"], 7);
        assert_eq!(json["iss"], "meshmon-backend");
    }

    #[test]
    fn test_claims_never_carry_permissions() {
        let json = serde_json::to_value(claims_for("user")).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("role"));
        assert!(!object.contains_key("permissions"));
    }

    #[test]
    fn test_account_info_serialization() {
        let info = AccountInfo {
            principal: Principal::Service(12),
            role: Role {
                id: 2,
                name: "collector".to_string(),
                permissions: PermissionSet::of(&[Permission::DataCreate]),
            },
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["accountType"], "service");
        assert_eq!(json["accountID"], 12);
        assert_eq!(json["role"]["name"], "collector");
        assert_eq!(json["role"]["permissions"][0], "data_create");
    }
}
