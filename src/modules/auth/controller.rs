use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;

use learnhub_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::utils::cookies::{clear_refresh_cookie, refresh_cookie, refresh_token_from};
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, TokenResponse, VerifyEmailRequest,
};
use super::service::AuthService;

const NO_REFRESH_TOKEN: &str = "Refresh token not found";

/// Register a new account
///
/// The account starts as `pending` and a six-digit verification code is emailed.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification code sent", body = ApiResponse<User>),
        (status = 400, description = "Invalid input, weak password or duplicate email/username", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    let user = AuthService::register_user(&state.db, &email_service, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Registration successful, check your email for the verification code",
            user,
        )),
    ))
}

/// Log in
///
/// Returns an access token in the body and sets the `refreshToken` cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or blocked account", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AppError> {
    let outcome = AuthService::login_user(&state.db, &state.jwt_config, dto).await?;

    let jar = jar.add(refresh_cookie(
        outcome.refresh_token,
        state.jwt_config.refresh_token_expiry,
        state.server_config.cookie_secure,
    ));

    Ok((
        jar,
        Json(ApiResponse::with_message("Login successful", outcome.response)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in or no refresh token cookie", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let refresh_token =
        refresh_token_from(&jar).ok_or_else(|| AppError::unauthorized(NO_REFRESH_TOKEN))?;

    AuthService::logout_user(&state.db, auth_user.user_id, &refresh_token).await?;

    Ok((
        clear_refresh_cookie(jar),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// Exchange the `refreshToken` cookie for a new access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    responses(
        (status = 200, description = "New access token", body = ApiResponse<TokenResponse>),
        (status = 401, description = "No refresh token cookie", body = ErrorResponse),
        (status = 403, description = "Refresh token invalid, expired or superseded", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<TokenResponse>>), AppError> {
    let refresh_token =
        refresh_token_from(&jar).ok_or_else(|| AppError::unauthorized(NO_REFRESH_TOKEN))?;

    let token =
        AuthService::refresh_access_token(&state.db, &state.jwt_config, &refresh_token).await?;

    let jar = jar.add(refresh_cookie(
        refresh_token,
        state.jwt_config.refresh_token_expiry,
        state.server_config.cookie_secure,
    ));

    Ok((jar, Json(ApiResponse::ok(TokenResponse { token }))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified, account active", body = ApiResponse<User>),
        (status = 400, description = "Code expired", body = ErrorResponse),
        (status = 404, description = "Invalid code", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = AuthService::verify_email(&state.db, dto).await?;
    Ok(Json(ApiResponse::with_message("Email verified", user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code sent", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    AuthService::forgot_password(&state.db, &email_service, dto).await?;
    Ok(Json(MessageResponse::new(
        "A password reset code has been sent to your email",
    )))
}

/// Reset the password with an emailed code
///
/// Returns a fresh access token for the account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Weak password", body = ErrorResponse),
        (status = 404, description = "Code invalid or expired", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let token = AuthService::reset_password(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Password has been reset",
        TokenResponse { token },
    )))
}
