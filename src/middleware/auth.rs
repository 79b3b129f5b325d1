use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use learnhub_auth::{TokenError, verify_token};
use learnhub_core::AppError;
use learnhub_models::{UserId, UserRole};

use crate::state::AppState;

pub const LOGIN_REQUIRED: &str = "You need to login first";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// The caller identified by a valid `Authorization: Bearer` access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// True for the owner of a resource and for admins.
    pub fn owns_or_admin(&self, owner: UserId) -> bool {
        self.is_admin() || self.user_id == owner
    }
}

/// Pulls the token out of an `Authorization` header value. Blank tokens count
/// as absent.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| AppError::unauthorized(LOGIN_REQUIRED))?;

        let claims = verify_token(token, &state.jwt_config).map_err(|e| match e {
            TokenError::Malformed => AppError::unauthorized(LOGIN_REQUIRED),
            _ => AppError::unauthorized(INVALID_TOKEN),
        })?;

        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::unauthorized(INVALID_TOKEN))?;

        Ok(AuthUser {
            user_id: claims.sub.into(),
            role,
        })
    }
}

/// Defines an extractor that authenticates the caller and then requires one of
/// the listed roles, rejecting others with 403.
#[macro_export]
macro_rules! require_role {
    ($name:ident, [$($role:path),+ $(,)?], $message:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = learnhub_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                if ![$($role),+].contains(&auth_user.role) {
                    return Err(learnhub_core::AppError::forbidden($message));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_role!(
    RequireAdmin,
    [UserRole::Admin],
    "Access denied. Administrator privileges required."
);
require_role!(
    RequireStaff,
    [UserRole::Admin, UserRole::Instructor],
    "Access denied. Instructor or administrator privileges required."
);
