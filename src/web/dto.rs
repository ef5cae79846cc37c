//! Request and response DTOs for the web API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A freshly issued token and its expiry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_wire_names() {
        let response = TokenResponse {
            token: "abc".to_string(),
            expires_at: DateTime::from_timestamp(1_700_086_400, 0).unwrap(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "abc");
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("expires_at").is_none());
    }
}
