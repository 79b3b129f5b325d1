use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use learnhub_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateReviewDto, Review, ReviewFilterParams, ReviewId, ReviewWithDetails, UpdateReviewDto,
};
use super::service::ReviewService;

#[utoipa::path(
    post,
    path = "/api/v1/review",
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<Review>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<ApiResponse<Review>>), AppError> {
    let review = ReviewService::create_review(&state.db, &auth_user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Review created", review)),
    ))
}

/// List reviews with their author's name and course title
#[utoipa::path(
    get,
    path = "/api/v1/review",
    params(ReviewFilterParams),
    responses(
        (status = 200, description = "Paginated list of reviews", body = ApiResponse<Vec<ReviewWithDetails>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn get_reviews(
    State(state): State<AppState>,
    filters: Result<Query<ReviewFilterParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ReviewWithDetails>>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(format!("Invalid query parameters: {}", e)))?;

    let page = ReviewService::list_reviews(&state.db, filters).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/review/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = ApiResponse<ReviewWithDetails>),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<ApiResponse<ReviewWithDetails>>, AppError> {
    let review = ReviewService::find_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(review)))
}

#[utoipa::path(
    put,
    path = "/api/v1/review/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewDto,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the review author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
pub async fn update_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ReviewId>,
    ValidatedJson(dto): ValidatedJson<UpdateReviewDto>,
) -> Result<Json<ApiResponse<Review>>, AppError> {
    let review = ReviewService::update_review(&state.db, &auth_user, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Review updated", review)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/review/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<Review>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the review author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
pub async fn delete_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ReviewId>,
) -> Result<Json<ApiResponse<Review>>, AppError> {
    let review = ReviewService::delete_review(&state.db, &auth_user, id).await?;
    Ok(Json(ApiResponse::with_message("Review deleted", review)))
}
