use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use learnhub_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::{AuthUser, RequireStaff};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{Course, CourseFilterParams, CourseId, CreateCourseDto, UpdateCourseDto};
use super::service::CourseService;

/// Create a course
///
/// Instructors default to teaching the course themselves. Approval fields are
/// admin-only.
#[utoipa::path(
    post,
    path = "/api/v1/course",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<Course>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admins and instructors only", body = ErrorResponse),
        (status = 404, description = "Instructor or approving admin not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn create_course(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), AppError> {
    let course = CourseService::create_course(&state.db, &auth_user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Course created", course)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/course",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Paginated list of courses", body = ApiResponse<Vec<Course>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    filters: Result<Query<CourseFilterParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Course>>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(format!("Invalid query parameters: {}", e)))?;

    let page = CourseService::list_courses(&state.db, filters).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/course/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = ApiResponse<Course>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let course = CourseService::find_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(course)))
}

#[utoipa::path(
    put,
    path = "/api/v1/course/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<Course>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the course instructor, or approval without admin role", body = ErrorResponse),
        (status = 404, description = "Course or approving admin not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let course = CourseService::update_course(&state.db, &auth_user, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Course updated", course)))
}

/// Unpublish a course
#[utoipa::path(
    delete,
    path = "/api/v1/course/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course unpublished", body = ApiResponse<Course>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the course instructor", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let course = CourseService::delete_course(&state.db, &auth_user, id).await?;
    Ok(Json(ApiResponse::with_message("Course unpublished", course)))
}
