//! User accounts.
//!
//! [`User`] is the public projection returned by every endpoint. [`UserRecord`]
//! adds the credential columns (password hash, codes, refresh token) and is only
//! used inside services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use learnhub_core::pagination::PaginationParams;
use learnhub_core::serde::deserialize_optional_parse;

use crate::enums::{UserRole, UserStatus};
use crate::ids::{CourseId, UserId};

/// Columns selected into [`User`].
pub const USER_COLUMNS: &str =
    "id, username, email, fullname, role, status, enrolled_courses, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub enrolled_courses: Vec<CourseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A full `users` row. Not serializable.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
    pub refresh_token: Option<String>,
    pub verify_code: Option<String>,
    pub verify_code_expires_at: Option<DateTime<Utc>>,
    pub reset_password_code: Option<String>,
    pub reset_password_expires_at: Option<DateTime<Utc>>,
}

/// Admin-only account creation. The account is active immediately.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Fullname must be between 1 and 100 characters"))]
    pub fullname: String,
    pub role: Option<UserRole>,
}

/// Partial profile update. `role`, `status` and `enrolled_courses` are admin-only.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Fullname must be between 1 and 100 characters"))]
    pub fullname: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub enrolled_courses: Option<Vec<CourseId>>,
}

impl UpdateUserDto {
    pub fn touches_admin_fields(&self) -> bool {
        self.role.is_some() || self.status.is_some() || self.enrolled_courses.is_some()
    }
}

/// `GET /user` filters. Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    pub email: Option<String>,
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    /// Users enrolled in this course
    #[serde(rename = "courseId", default, deserialize_with = "deserialize_optional_parse")]
    pub course_id: Option<CourseId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
