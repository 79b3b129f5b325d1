//! # LearnHub Auth
//!
//! JWT claims and token utilities.
//!
//! - **Access token** ([`Claims`]): short-lived, sent as `Authorization: Bearer <token>`
//! - **Refresh token** ([`RefreshTokenClaims`]): long-lived, stored on the user record and
//!   delivered in the `refreshToken` cookie
//!
//! Verification failures are reported as [`TokenError`]; translating them into HTTP
//! statuses is left to the caller, since the same failure is a 401 on the bearer
//! path and a 403 on the refresh path.

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{
    TokenError, create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
