use sqlx::PgPool;
use tracing::instrument;

use learnhub_core::{AppError, Page, PaginationMeta};

use crate::middleware::auth::AuthUser;
use crate::modules::course_modules::model::{
    CreateModuleDto, MODULE_COLUMNS, Module, ModuleFilterParams, ModuleId, ModuleStatus,
    UpdateModuleDto,
};
use crate::modules::courses::CourseService;
use crate::modules::courses::service::ensure_can_manage;

pub const DEFAULT_MODULE_LIMIT: i64 = 100;
pub const NO_COURSE_ID: &str = "No course ID provided";

pub struct ModuleService;

impl ModuleService {
    /// Active modules of one course, in index order.
    #[instrument(skip(db))]
    pub async fn list_modules(
        db: &PgPool,
        filters: ModuleFilterParams,
    ) -> Result<Page<Module>, AppError> {
        let course_id = filters
            .course_id
            .ok_or_else(|| AppError::bad_request(NO_COURSE_ID))?;
        let limit = filters.pagination.limit_or(DEFAULT_MODULE_LIMIT);
        let page = filters.pagination.page();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM modules WHERE course_id = $1 AND status = $2",
        )
        .bind(course_id)
        .bind(ModuleStatus::Active)
        .fetch_one(db)
        .await?;

        let modules = sqlx::query_as::<_, Module>(&format!(
            "SELECT {MODULE_COLUMNS} FROM modules
             WHERE course_id = $1 AND status = $2
             ORDER BY index ASC, created_at ASC
             LIMIT $3 OFFSET $4"
        ))
        .bind(course_id)
        .bind(ModuleStatus::Active)
        .bind(limit)
        .bind(filters.pagination.offset(limit))
        .fetch_all(db)
        .await?;

        Ok(Page {
            data: modules,
            meta: PaginationMeta::new(total, limit, page),
        })
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: ModuleId) -> Result<Module, AppError> {
        sqlx::query_as::<_, Module>(&format!("SELECT {MODULE_COLUMNS} FROM modules WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Module not found"))
    }

    /// Appends a module to its course. The index is one past the number of
    /// modules the course has ever had, deleted ones included.
    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create_module(
        db: &PgPool,
        actor: &AuthUser,
        dto: CreateModuleDto,
    ) -> Result<Module, AppError> {
        let course = CourseService::find_by_id(db, dto.course_id).await?;
        ensure_can_manage(actor, &course)?;

        let module = sqlx::query_as::<_, Module>(&format!(
            "INSERT INTO modules (course_id, title, description, index)
             VALUES ($1, $2, $3, (SELECT COUNT(*) + 1 FROM modules WHERE course_id = $1))
             RETURNING {MODULE_COLUMNS}"
        ))
        .bind(course.id)
        .bind(&dto.title)
        .bind(&dto.description)
        .fetch_one(db)
        .await?;

        Ok(module)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_module(
        db: &PgPool,
        actor: &AuthUser,
        id: ModuleId,
        dto: UpdateModuleDto,
    ) -> Result<Module, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        let course = CourseService::find_by_id(db, existing.course_id).await?;
        ensure_can_manage(actor, &course)?;

        let module = sqlx::query_as::<_, Module>(&format!(
            "UPDATE modules
             SET title = $1, description = $2, index = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {MODULE_COLUMNS}"
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.description.or(existing.description))
        .bind(dto.index.unwrap_or(existing.index))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(module)
    }

    /// Soft delete: the module keeps its index but drops out of listings.
    #[instrument(skip(db))]
    pub async fn delete_module(
        db: &PgPool,
        actor: &AuthUser,
        id: ModuleId,
    ) -> Result<Module, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        let course = CourseService::find_by_id(db, existing.course_id).await?;
        ensure_can_manage(actor, &course)?;

        let module = sqlx::query_as::<_, Module>(&format!(
            "UPDATE modules SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {MODULE_COLUMNS}"
        ))
        .bind(ModuleStatus::Deleted)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(module)
    }
}
