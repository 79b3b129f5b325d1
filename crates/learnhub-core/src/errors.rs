//! Application error type with HTTP response conversion.
//!
//! Every failure a handler can produce is one of a closed set of variants, and
//! each variant owns its status code. Handlers never pick a status by hand.
//!
//! | Variant | Status |
//! |---------|--------|
//! | [`AppError::Validation`] | 400 |
//! | [`AppError::Unauthenticated`] | 401 |
//! | [`AppError::Forbidden`] | 403 |
//! | [`AppError::NotFound`] | 404 |
//! | [`AppError::Dependency`] | 500 |
//! | [`AppError::Unexpected`] | 500 |
//!
//! Any error convertible into [`anyhow::Error`] (notably `sqlx::Error`) turns into
//! [`AppError::Unexpected`] through `?`, so service code can propagate driver
//! failures without mapping them.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Message returned to clients for [`AppError::Unexpected`].
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum AppError {
    /// Malformed input or a policy violation.
    Validation(String),
    /// Missing or invalid credentials.
    Unauthenticated(String),
    /// Valid identity without the required role or ownership.
    Forbidden(String),
    /// The referenced entity does not exist.
    NotFound(String),
    /// An external collaborator (SMTP) failed.
    Dependency(String),
    /// Anything else. The cause is logged, never sent to the client.
    Unexpected(anyhow::Error),
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl AppError {
    pub fn bad_request<E: fmt::Display>(err: E) -> Self {
        Self::Validation(err.to_string())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found<E: fmt::Display>(err: E) -> Self {
        Self::NotFound(err.to_string())
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Unexpected(anyhow::anyhow!(message.into()))
    }

    /// Flattens `validator` failures into a single 400 message.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        Self::Validation(format_validation_errors(errors))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Dependency(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message a client sees for this error.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Dependency(msg) => msg.clone(),
            Self::Unexpected(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexpected(err) => write!(f, "{err:#}"),
            other => f.write_str(&other.public_message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unexpected(err) => tracing::error!(error = ?err, "Unexpected error"),
            Self::Dependency(msg) => tracing::error!(error = %msg, "Dependency failure"),
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Unexpected(err.into())
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
        rating: i32,
        #[validate(length(min = 1))]
        comment: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::dependency("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::internal_error("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_anyhow_converts_to_unexpected() {
        let err: AppError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, AppError::Unexpected(_)));
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_errors_are_flattened() {
        let sample = Sample {
            rating: 9,
            comment: String::new(),
        };
        let err = AppError::from_validation(&sample.validate().unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.public_message(),
            "Rating must be between 1 and 5, comment is invalid"
        );
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = AppError::not_found("Course not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Course not found");
    }

    #[tokio::test]
    async fn test_unexpected_error_hides_cause() {
        let response = AppError::internal_error("pool timed out").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}
