//! JWT session token utilities.
//!
//! Provides token creation and validation for user sessions. The signing
//! secret and token lifetime come from the process-wide [`Config`] and are
//! fixed at construction; nothing here re-reads the environment at runtime.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ServiceError;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// JWT token utility for creating and validating session tokens.
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the application config.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Token lifetime in seconds, also used for the session cookie max age.
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Generate a new session token for a user.
    pub fn generate_token(&self, user_id: String) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a session token.
    ///
    /// Malformed, tampered and expired tokens all fail the same way; the
    /// decode cause is only logged.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                tracing::debug!("session token rejected: {}", e);
                ServiceError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: secret.to_string(),
            jwt_expires_in_seconds: 86400,
            server_port: 3000,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            tts_api_url: "http://localhost:9999/synthesize".to_string(),
            tts_api_key: None,
            uploads_dir: "uploads".to_string(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt = JwtUtils::new(&test_config("test-secret-key-for-testing-only"));
        let token = jwt
            .generate_token("user-123".to_string())
            .expect("should create token");

        let claims = jwt.validate_token(&token).expect("should validate token");
        assert_eq!(claims.user_id(), "user-123");
        assert_eq!(
            claims.exp - claims.iat,
            jwt.expires_in_seconds() as usize,
            "expiry is exactly the configured lifetime after issuance"
        );
    }

    #[test]
    fn test_malformed_token_rejected() {
        let jwt = JwtUtils::new(&test_config("test-secret-key-for-testing-only"));
        let result = jwt.validate_token("not-a-token");
        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = JwtUtils::new(&test_config("test-secret-key-for-testing-only"));
        let token = jwt
            .generate_token("user-123".to_string())
            .expect("should create token");

        let other = JwtUtils::new(&test_config("a-different-secret"));
        assert!(matches!(
            other.validate_token(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config("test-secret-key-for-testing-only");
        let jwt = JwtUtils::new(&config);

        // Encode a token that expired two hours ago, well past the
        // validator's leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-123".to_string(),
            exp: (now - 7200) as usize,
            iat: (now - 7200 - 86400) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .expect("should encode");

        assert!(matches!(
            jwt.validate_token(&token),
            Err(ServiceError::InvalidToken)
        ));
    }
}
