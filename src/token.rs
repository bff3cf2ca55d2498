//! Token Codec
//!
//! Issues and verifies HS256-signed session tokens. The signing secret is
//! handed in at construction; tokens carry no expiry.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{SessionClaims, AUTH_ACCESS};

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashSet;
use uuid::Uuid;

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from a signing secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Create a codec from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Issue an auth token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: user_id,
            access: AUTH_ACCESS.to_string(),
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token's signature and purpose, returning the embedded user ID
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.access != AUTH_ACCESS {
            tracing::debug!(access = %token_data.claims.access, "Token has wrong access tag");
            return Err(AppError::InvalidToken);
        }

        Ok(token_data.claims.sub)
    }
}
