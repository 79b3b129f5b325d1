//! Course modules, ordered by `index` within a course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use learnhub_core::pagination::PaginationParams;
use learnhub_core::serde::deserialize_optional_parse;

use crate::enums::ModuleStatus;
use crate::ids::{CourseId, ModuleId};

pub const MODULE_COLUMNS: &str =
    "id, course_id, title, description, index, status, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Module {
    pub id: ModuleId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub index: i32,
    pub status: ModuleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The index is assigned by the server.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateModuleDto {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateModuleDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Index must be at least 1"))]
    pub index: Option<i32>,
}

/// `GET /module` filters. `courseId` is mandatory; it stays optional here so
/// that its absence is reported as "No course ID provided".
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModuleFilterParams {
    #[serde(rename = "courseId", default, deserialize_with = "deserialize_optional_parse")]
    pub course_id: Option<CourseId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_module_body() {
        let course_id = CourseId::new();
        let dto: CreateModuleDto = serde_json::from_value(serde_json::json!({
            "course_id": course_id.to_string(),
            "title": "Ownership"
        }))
        .unwrap();
        assert_eq!(dto.course_id, course_id);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_module_rejects_zero_index() {
        let dto = UpdateModuleDto {
            index: Some(0),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
