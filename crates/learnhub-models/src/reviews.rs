//! Course reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use learnhub_core::pagination::PaginationParams;
use learnhub_core::serde::deserialize_optional_parse;

use crate::ids::{CourseId, ReviewId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub course_id: CourseId,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review joined with its author's name and its course's title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReviewWithDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub author_fullname: String,
    pub course_title: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewDto {
    pub course_id: CourseId,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, max = 5000, message = "Comment must be between 1 and 5000 characters"))]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(min = 1, max = 5000, message = "Comment must be between 1 and 5000 characters"))]
    pub comment: Option<String>,
}

/// `GET /review` filters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub course: Option<CourseId>,
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub user: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub rating: Option<i32>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
