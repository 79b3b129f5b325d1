//! JWT claim structures.
//!
//! - [`Claims`]: access token, carries the user id and role
//! - [`RefreshTokenClaims`]: refresh token, carries the user id and a unique `jti`

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims embedded in access tokens.
///
/// The role is read from the token on every request, so a role change takes
/// effect once the user's current access token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User id (subject claim)
    pub sub: Uuid,
    /// `admin`, `instructor` or `student`
    pub role: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Claims embedded in refresh tokens.
///
/// `jti` makes two tokens issued within the same second distinct, which matters
/// because the stored token is compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}
