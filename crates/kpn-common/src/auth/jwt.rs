//! JWT verification for member tokens
//!
//! The membership web layer signs in-app tokens whose subject is the
//! member ID; the engine verifies them with the shared secret. `issue`
//! exists for that web layer and for tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use kpn_core::Snowflake;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Issuer claim stamped on and required of every token
pub const TOKEN_ISSUER: &str = "kpn";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    /// Get the member ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a Snowflake
    pub fn member_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        }
    }

    /// Sign a token for a member
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, member_id: Snowflake) -> Result<String, AppError> {
        self.issue_with_expiry(member_id, self.token_expiry)
    }

    fn issue_with_expiry(&self, member_id: Snowflake, expiry_secs: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: member_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("failed to encode JWT: {e}")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate a token and return the member it speaks for
    pub fn authenticate(&self, token: &str) -> Result<Snowflake, AppError> {
        self.validate(token)?.member_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900)
    }

    #[test]
    fn test_issue_and_authenticate() {
        let service = create_test_service();
        let member_id = Snowflake::new(12345);

        let token = service.issue(member_id).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "12345");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(!claims.is_expired());
        assert_eq!(service.authenticate(&token).unwrap(), member_id);
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        // Past the default 60s leeway
        let token = service.issue_with_expiry(Snowflake::new(1), -120).unwrap();
        assert!(matches!(service.validate(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_test_service().issue(Snowflake::new(1)).unwrap();
        let other = JwtService::new("another-secret-key-of-decent-length", 900);
        assert!(matches!(other.validate(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(matches!(
            service.validate("invalid.token.here"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "admin".to_string(),
            iat: 0,
            exp: i64::MAX,
            iss: TOKEN_ISSUER.to_string(),
        };
        assert!(matches!(claims.member_id(), Err(AppError::InvalidToken)));
    }
}
