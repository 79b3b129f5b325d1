//! Courses and course codes.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use learnhub_core::pagination::PaginationParams;
use learnhub_core::serde::{deserialize_comma_list, deserialize_optional_parse};

use crate::enums::CourseStatus;
use crate::ids::{CourseId, UserId};

pub const COURSE_COLUMNS: &str = "id, course_code, title, description, instructor_id, price, \
     level, tags, photo, is_approved, approved_by, status, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    #[schema(example = "RUS-WEB-48213")]
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Option<UserId>,
    pub price: f64,
    pub level: Option<String>,
    pub tags: Vec<String>,
    pub photo: Option<String>,
    pub is_approved: bool,
    pub approved_by: Option<UserId>,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to the caller when an instructor creates the course
    pub instructor_id: Option<UserId>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[serde(default)]
    pub price: f64,
    #[validate(length(max = 50, message = "Level cannot exceed 50 characters"))]
    pub level: Option<String>,
    #[validate(length(max = 20, message = "A course can have at most 20 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(url(message = "Photo must be a URL"))]
    pub photo: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    pub approved_by: Option<UserId>,
    pub status: Option<CourseStatus>,
}

/// Partial update. `is_approved` and `approved_by` are admin-only.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(length(max = 50, message = "Level cannot exceed 50 characters"))]
    pub level: Option<String>,
    #[validate(length(max = 20, message = "A course can have at most 20 tags"))]
    pub tags: Option<Vec<String>>,
    #[validate(url(message = "Photo must be a URL"))]
    pub photo: Option<String>,
    pub is_approved: Option<bool>,
    pub approved_by: Option<UserId>,
    pub status: Option<CourseStatus>,
}

impl UpdateCourseDto {
    pub fn touches_approval(&self) -> bool {
        self.is_approved.is_some() || self.approved_by.is_some()
    }
}

/// `GET /course` filters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilterParams {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_parse")]
    pub instructor: Option<UserId>,
    #[serde(rename = "lowPrice", default, deserialize_with = "deserialize_optional_parse")]
    pub low_price: Option<f64>,
    #[serde(rename = "highPrice", default, deserialize_with = "deserialize_optional_parse")]
    pub high_price: Option<f64>,
    /// Comma-separated; a course matches if it carries any of them
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    #[param(value_type = Option<String>, example = "rust,web")]
    #[schema(value_type = Option<String>)]
    pub tags: Option<Vec<String>>,
    pub level: Option<String>,
    pub status: Option<CourseStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Builds a course code from the first three characters of each tag, e.g.
/// `["rust", "web"]` becomes `RUS-WEB-48213`. Untagged courses get `COURSE-48213`.
pub fn generate_course_code(tags: &[String]) -> String {
    let number: u32 = rand::thread_rng().gen_range(10_000..=99_999);
    course_code_with_number(tags, number)
}

fn course_code_with_number(tags: &[String], number: u32) -> String {
    let prefix = tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.chars().take(3).collect::<String>().to_uppercase())
        .collect::<Vec<_>>()
        .join("-");

    if prefix.is_empty() {
        format!("COURSE-{}", number)
    } else {
        format!("{}-{}", prefix, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_course_code_from_tags() {
        assert_eq!(
            course_code_with_number(&tags(&["rust", "web"]), 48213),
            "RUS-WEB-48213"
        );
        assert_eq!(course_code_with_number(&tags(&["ai"]), 10000), "AI-10000");
    }

    #[test]
    fn test_course_code_without_tags() {
        assert_eq!(course_code_with_number(&[], 55555), "COURSE-55555");
        assert_eq!(course_code_with_number(&tags(&["  "]), 55555), "COURSE-55555");
    }

    #[test]
    fn test_generated_code_has_five_digits() {
        let code = generate_course_code(&tags(&["data", "science"]));
        let (prefix, number) = code.rsplit_once('-').unwrap();
        assert_eq!(prefix, "DAT-SCI");
        assert_eq!(number.len(), 5);
        assert!(number.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_negative_price_rejected() {
        let dto: CreateCourseDto = serde_json::from_value(serde_json::json!({
            "title": "Rust 101",
            "price": -1.0
        }))
        .unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn test_level_and_tags_bounded() {
        let dto: CreateCourseDto = serde_json::from_value(serde_json::json!({
            "title": "Rust 101",
            "level": "x".repeat(51),
            "tags": (0..21).map(|i| format!("tag{i}")).collect::<Vec<_>>()
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("level"));
        assert!(errors.field_errors().contains_key("tags"));

        let dto = UpdateCourseDto {
            level: Some("beginner".to_string()),
            tags: Some(vec!["rust".to_string(); 20]),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_touches_approval() {
        assert!(!UpdateCourseDto::default().touches_approval());
        let dto = UpdateCourseDto {
            is_approved: Some(true),
            ..Default::default()
        };
        assert!(dto.touches_approval());
    }
}
