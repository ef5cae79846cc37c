//! Signed session tokens.
//!
//! Compact three-part HMAC tokens over JSON claims. Validation is
//! stateless: there is no issued-token list and no revocation store, so a
//! token stays valid until its own expiry regardless of logout.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::error::AuthError;
use super::principal::Claims;

/// A signed token string with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and validates session tokens with a shared symmetric secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from the signing secret and clock-skew leeway.
    pub fn new(secret: &[u8], leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign claims into a compact token.
    pub fn sign(&self, claims: &Claims) -> Result<SignedToken, AuthError> {
        let value = encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(e.to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::Crypto("token expiry out of range".to_string()))?;

        Ok(SignedToken { value, expires_at })
    }

    /// Validate a token string and recover its claims.
    ///
    /// Malformed input, a bad signature, and an expired or not-yet-valid
    /// window all return the same `InvalidToken` so callers cannot probe
    /// which check failed.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token validation failed: {e}");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::principal::Principal;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 5)
    }

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> Claims {
        Claims::new(
            Principal::User(42),
            "meshmon-backend",
            "alice",
            issued_at,
            ttl,
        )
    }

    #[test]
    fn test_sign_validate_round_trip() {
        let codec = codec();
        let claims = claims(Utc::now(), Duration::hours(24));

        let token = codec.sign(&claims).unwrap();
        assert_eq!(token.expires_at.timestamp(), claims.exp);
        assert_eq!(token.value.matches('.').count(), 2);

        let recovered = codec.validate(&token.value).unwrap();
        assert_eq!(recovered.account_type, "user");
        assert_eq!(recovered.account_id, 42);
        assert_eq!(recovered.principal(), Ok(Principal::User(42)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();
        let claims = claims(Utc::now() - Duration::hours(2), Duration::hours(1));

        let token = codec.sign(&claims).unwrap();
        assert_eq!(codec.validate(&token.value), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_leeway_tolerates_small_skew() {
        let codec = TokenCodec::new(SECRET, 30);
        // Expired ten seconds ago, inside the 30s leeway.
        let claims = claims(
            Utc::now() - Duration::seconds(70),
            Duration::seconds(60),
        );

        let token = codec.sign(&claims).unwrap();
        assert!(codec.validate(&token.value).is_ok());
    }

    #[test]
    fn test_wrong_secret_indistinguishable_from_expiry() {
        let codec = codec();
        let other = TokenCodec::new(b"another-secret", 5);

        let good = claims(Utc::now(), Duration::hours(1));
        let forged = other.sign(&good).unwrap();
        let stale = codec
            .sign(&claims(Utc::now() - Duration::hours(2), Duration::hours(1)))
            .unwrap();

        // Same error for tampering and expiry.
        assert_eq!(
            codec.validate(&forged.value),
            codec.validate(&stale.value)
        );
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = codec();
        assert_eq!(codec.validate(""), Err(AuthError::InvalidToken));
        assert_eq!(codec.validate("not-a-token"), Err(AuthError::InvalidToken));
        assert_eq!(
            codec.validate("aaaa.bbbb.cccc"),
            Err(AuthError::InvalidToken)
        );
    }
}
