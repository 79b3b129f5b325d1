//! Role-based authorization middleware.
//!
//! Route-level checks use the [`RequireAdmin`](super::auth::RequireAdmin) and
//! [`RequireStaff`](super::auth::RequireStaff) extractors. Whole routers are
//! guarded with these functions through `axum::middleware::from_fn_with_state`:
//!
//! ```rust,ignore
//! init_payments_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use learnhub_core::AppError;
use learnhub_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Authenticates the request and lets it through only for `allowed_roles`.
/// The resolved [`AuthUser`] is stored in the request extensions.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_role(&auth_user, allowed_roles)?;

    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub fn check_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if allowed_roles.contains(&auth_user.role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. Role '{}' is not allowed to access this resource.",
            auth_user.role
        )))
    }
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(State(state), req, next, &[UserRole::Admin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_models::UserId;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: UserId::new(),
            role,
        }
    }

    #[test]
    fn test_check_role_allows_listed_roles() {
        let staff = [UserRole::Admin, UserRole::Instructor];
        assert!(check_role(&user(UserRole::Admin), &staff).is_ok());
        assert!(check_role(&user(UserRole::Instructor), &staff).is_ok());
    }

    #[test]
    fn test_check_role_rejects_others_with_forbidden() {
        let err = check_role(&user(UserRole::Student), &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
        assert!(err.public_message().contains("student"));
    }
}
