//! Payment handlers. The router applies the admin check to all of them.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use learnhub_core::{ApiResponse, AppError, ErrorResponse};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CreatePaymentDto, Payment, PaymentFilterParams, PaymentId, UpdatePaymentDto};
use super::service::PaymentService;

#[utoipa::path(
    post,
    path = "/api/v1/payment",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<Payment>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "User or course not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn create_payment(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), AppError> {
    let payment = PaymentService::create_payment(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Payment created", payment)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/payment",
    params(PaymentFilterParams),
    responses(
        (status = 200, description = "Paginated list of payments", body = ApiResponse<Vec<Payment>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn get_payments(
    State(state): State<AppState>,
    filters: Result<Query<PaymentFilterParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(format!("Invalid query parameters: {}", e)))?;

    let page = PaymentService::list_payments(&state.db, filters).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/payment/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment details", body = ApiResponse<Payment>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let payment = PaymentService::find_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(payment)))
}

#[utoipa::path(
    put,
    path = "/api/v1/payment/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = UpdatePaymentDto,
    responses(
        (status = 200, description = "Payment updated", body = ApiResponse<Payment>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
    ValidatedJson(dto): ValidatedJson<UpdatePaymentDto>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let payment = PaymentService::update_payment(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Payment updated", payment)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/payment/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment marked deleted", body = ApiResponse<Payment>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let payment = PaymentService::delete_payment(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message("Payment deleted", payment)))
}
