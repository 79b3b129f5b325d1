use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use learnhub_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::{AuthUser, RequireStaff};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CreateModuleDto, Module, ModuleFilterParams, ModuleId, UpdateModuleDto};
use super::service::ModuleService;

/// List the active modules of a course
#[utoipa::path(
    get,
    path = "/api/v1/module",
    params(ModuleFilterParams),
    responses(
        (status = 200, description = "Modules ordered by index", body = ApiResponse<Vec<Module>>),
        (status = 400, description = "No course ID provided", body = ErrorResponse)
    ),
    tag = "Modules"
)]
pub async fn get_modules(
    State(state): State<AppState>,
    filters: Result<Query<ModuleFilterParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Module>>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(format!("Invalid query parameters: {}", e)))?;

    let page = ModuleService::list_modules(&state.db, filters).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/module/{id}",
    params(("id" = Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Module details", body = ApiResponse<Module>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
pub async fn get_module(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<ModuleId>,
) -> Result<Json<ApiResponse<Module>>, AppError> {
    let module = ModuleService::find_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(module)))
}

/// Append a module to a course
#[utoipa::path(
    post,
    path = "/api/v1/module",
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created", body = ApiResponse<Module>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the course instructor", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
pub async fn create_module(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateModuleDto>,
) -> Result<(StatusCode, Json<ApiResponse<Module>>), AppError> {
    let module = ModuleService::create_module(&state.db, &auth_user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Module created", module)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/module/{id}",
    params(("id" = Uuid, Path, description = "Module ID")),
    request_body = UpdateModuleDto,
    responses(
        (status = 200, description = "Module updated", body = ApiResponse<Module>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the course instructor", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
pub async fn update_module(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<UpdateModuleDto>,
) -> Result<Json<ApiResponse<Module>>, AppError> {
    let module = ModuleService::update_module(&state.db, &auth_user, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Module updated", module)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/module/{id}",
    params(("id" = Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Module deleted", body = ApiResponse<Module>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the course instructor", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
pub async fn delete_module(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<ModuleId>,
) -> Result<Json<ApiResponse<Module>>, AppError> {
    let module = ModuleService::delete_module(&state.db, &auth_user, id).await?;
    Ok(Json(ApiResponse::with_message("Module deleted", module)))
}
