use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{
    forgot_password, login_user, logout_user, refresh_token, register_user, reset_password,
    verify_email,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/refresh-token", post(refresh_token))
        .route("/verify-email", post(verify_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
