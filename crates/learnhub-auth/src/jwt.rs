//! Access and refresh token creation and verification (HS256).
//!
//! ```ignore
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "student", &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use learnhub_config::JwtConfig;

use crate::claims::{Claims, RefreshTokenClaims};

#[derive(Debug, Error)]
pub enum TokenError {
    /// No token was supplied, or it was blank.
    #[error("token is missing")]
    Malformed,
    /// Bad signature, expired, or not a JWT at all.
    #[error("token is invalid or expired")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

fn now() -> usize {
    Utc::now().timestamp() as usize
}

fn sign<T: Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(TokenError::Encoding)
}

fn verify<T: DeserializeOwned>(token: &str, jwt_config: &JwtConfig) -> Result<T, TokenError> {
    if token.trim().is_empty() {
        return Err(TokenError::Malformed);
    }

    decode::<T>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::Invalid)
}

/// Issues a short-lived access token for `user_id` with the given role.
pub fn create_access_token(
    user_id: Uuid,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let iat = now();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + jwt_config.access_token_expiry as usize,
        iat,
    };

    sign(&claims, jwt_config)
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, jwt_config)
}

/// Issues a refresh token. The caller persists it as the user's single active session.
pub fn create_refresh_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let iat = now();
    let claims = RefreshTokenClaims {
        sub: user_id,
        exp: iat + jwt_config.refresh_token_expiry as usize,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, jwt_config)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    verify(token, jwt_config)
}
