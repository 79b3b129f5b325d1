use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use learnhub_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use learnhub_config::JwtConfig;
use learnhub_core::{AppError, hash_password, validate_password_strength, verify_password};
use learnhub_models::{Email, UserId, UserRole, UserStatus};

use crate::modules::users::model::{USER_COLUMNS, User};
use crate::modules::users::service::{UserService, map_unique_violation};
use crate::utils::codes::{code_expiry, generate_code};
use crate::utils::email::EmailService;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    VerifyEmailRequest,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ACCOUNT_INACTIVE: &str = "Account inactive";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
pub const STALE_REFRESH_TOKEN: &str = "Refresh token is expired or used";

/// A successful login: the response body plus the refresh token for the cookie.
#[derive(Debug)]
pub struct LoginOutcome {
    pub response: LoginResponse,
    pub refresh_token: String,
}

pub struct AuthService;

impl AuthService {
    /// Creates a `pending` account and emails its verification code. If the
    /// email cannot be sent the code is cleared but the account is kept.
    #[instrument(skip(db, email_service, dto), fields(username = %dto.username))]
    pub async fn register_user(
        db: &PgPool,
        email_service: &EmailService,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        validate_password_strength(&dto.password)?;
        let email = Email::new(&dto.email).map_err(AppError::bad_request)?;

        UserService::ensure_unique(db, Some(&email), Some(&dto.username), None).await?;

        let hashed_password = hash_password(&dto.password)?;
        let code = generate_code();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, fullname, role, status,
                                verify_code, verify_code_expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(email.as_str())
        .bind(&hashed_password)
        .bind(&dto.fullname)
        .bind(UserRole::Student)
        .bind(UserStatus::Pending)
        .bind(&code)
        .bind(code_expiry(Utc::now()))
        .fetch_one(db)
        .await
        .map_err(map_unique_violation)?;

        if let Err(e) = email_service
            .send_verification_code(&user.email, &user.fullname, &code)
            .await
        {
            sqlx::query(
                "UPDATE users SET verify_code = NULL, verify_code_expires_at = NULL WHERE id = $1",
            )
            .bind(user.id)
            .execute(db)
            .await?;
            return Err(e);
        }

        learnhub_observability::track_user_registered(user.role.as_str());
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and opens the user's single session, replacing any
    /// previous refresh token.
    #[instrument(skip(db, jwt_config, dto))]
    pub async fn login_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginOutcome, AppError> {
        let Ok(email) = Email::new(&dto.email) else {
            learnhub_observability::track_user_login_failure("invalid_credentials");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        let Some(record) = UserService::find_record_by_email(db, &email).await? else {
            learnhub_observability::track_user_login_failure("invalid_credentials");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if record.user.status == UserStatus::Block {
            learnhub_observability::track_user_login_failure("account_inactive");
            return Err(AppError::unauthorized(ACCOUNT_INACTIVE));
        }

        if !verify_password(&dto.password, &record.password)? {
            learnhub_observability::track_user_login_failure("invalid_credentials");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = record.user;
        let refresh_token = create_refresh_token(user.id.into_inner(), jwt_config)?;
        sqlx::query("UPDATE users SET refresh_token = $1 WHERE id = $2")
            .bind(&refresh_token)
            .bind(user.id)
            .execute(db)
            .await?;

        let token = create_access_token(user.id.into_inner(), user.role.as_str(), jwt_config)?;

        learnhub_observability::track_user_login_success(user.role.as_str());
        learnhub_observability::track_jwt_issued();

        Ok(LoginOutcome {
            response: LoginResponse { user, token },
            refresh_token,
        })
    }

    /// Drops the stored refresh token if it is the one presented.
    #[instrument(skip(db, refresh_token))]
    pub async fn logout_user(
        db: &PgPool,
        user_id: UserId,
        refresh_token: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET refresh_token = NULL WHERE id = $1 AND refresh_token = $2",
        )
        .bind(user_id)
        .bind(refresh_token)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Issues a new access token for a refresh token that is still the user's
    /// stored one. The refresh token itself is not rotated.
    #[instrument(skip(db, jwt_config, refresh_token))]
    pub async fn refresh_access_token(
        db: &PgPool,
        jwt_config: &JwtConfig,
        refresh_token: &str,
    ) -> Result<String, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)
            .map_err(|_| AppError::forbidden(INVALID_REFRESH_TOKEN))?;

        let record = UserService::find_record_by_id(db, claims.sub.into())
            .await?
            .ok_or_else(|| AppError::forbidden(INVALID_REFRESH_TOKEN))?;

        if record.refresh_token.as_deref() != Some(refresh_token) {
            return Err(AppError::forbidden(STALE_REFRESH_TOKEN));
        }

        let token = create_access_token(
            record.user.id.into_inner(),
            record.user.role.as_str(),
            jwt_config,
        )?;
        learnhub_observability::track_jwt_issued();

        Ok(token)
    }

    /// Consumes a verification code and activates a pending account.
    #[instrument(skip(db, dto))]
    pub async fn verify_email(db: &PgPool, dto: VerifyEmailRequest) -> Result<User, AppError> {
        let (user_id, expires_at) = sqlx::query_as::<_, (UserId, Option<chrono::DateTime<Utc>>)>(
            "SELECT id, verify_code_expires_at FROM users WHERE verify_code = $1",
        )
        .bind(&dto.code)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Invalid code"))?;

        if expires_at.is_none_or(|expires_at| expires_at < Utc::now()) {
            return Err(AppError::bad_request("Code expired"));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET verify_code = NULL, verify_code_expires_at = NULL,
                 status = CASE WHEN status = $1 THEN $2 ELSE status END,
                 updated_at = NOW()
             WHERE id = $3
             RETURNING {USER_COLUMNS}"
        ))
        .bind(UserStatus::Pending)
        .bind(UserStatus::Active)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Stores a reset code and emails it. The code is cleared again if the
    /// email cannot be sent.
    #[instrument(skip(db, email_service, dto))]
    pub async fn forgot_password(
        db: &PgPool,
        email_service: &EmailService,
        dto: ForgotPasswordRequest,
    ) -> Result<(), AppError> {
        let email = Email::new(&dto.email).map_err(AppError::bad_request)?;
        let record = UserService::find_record_by_email(db, &email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let code = generate_code();
        sqlx::query(
            "UPDATE users SET reset_password_code = $1, reset_password_expires_at = $2
             WHERE id = $3",
        )
        .bind(&code)
        .bind(code_expiry(Utc::now()))
        .bind(record.user.id)
        .execute(db)
        .await?;

        if let Err(e) = email_service
            .send_password_reset_code(&record.user.email, &record.user.fullname, &code)
            .await
        {
            sqlx::query(
                "UPDATE users SET reset_password_code = NULL, reset_password_expires_at = NULL
                 WHERE id = $1",
            )
            .bind(record.user.id)
            .execute(db)
            .await?;
            return Err(e);
        }

        Ok(())
    }

    /// Sets a new password for the holder of a live reset code and returns a
    /// fresh access token.
    #[instrument(skip(db, jwt_config, dto))]
    pub async fn reset_password(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: ResetPasswordRequest,
    ) -> Result<String, AppError> {
        validate_password_strength(&dto.password)?;
        let hashed_password = hash_password(&dto.password)?;

        let (user_id, role) = sqlx::query_as::<_, (UserId, UserRole)>(
            "UPDATE users
             SET password = $1, reset_password_code = NULL, reset_password_expires_at = NULL,
                 updated_at = NOW()
             WHERE reset_password_code = $2 AND reset_password_expires_at > NOW()
             RETURNING id, role",
        )
        .bind(&hashed_password)
        .bind(&dto.code)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Token is invalid or has expired"))?;

        let token = create_access_token(user_id.into_inner(), role.as_str(), jwt_config)?;
        learnhub_observability::track_jwt_issued();

        Ok(token)
    }
}
