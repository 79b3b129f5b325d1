use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use learnhub_core::{AppError, Page, PaginationMeta};
use learnhub_db::Filters;
use learnhub_db::filters::push_page;
use learnhub_models::{UserId, UserRole};

use crate::middleware::auth::AuthUser;
use crate::modules::courses::model::{
    COURSE_COLUMNS, Course, CourseFilterParams, CourseId, CourseStatus, CreateCourseDto,
    UpdateCourseDto, generate_course_code,
};
use crate::modules::users::UserService;

pub const DEFAULT_COURSE_LIMIT: i64 = 100;

/// True for admins and for the instructor the course belongs to.
pub fn can_manage(actor: &AuthUser, course: &Course) -> bool {
    actor.is_admin() || course.instructor_id == Some(actor.user_id)
}

pub(crate) fn ensure_can_manage(actor: &AuthUser, course: &Course) -> Result<(), AppError> {
    if can_manage(actor, course) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the course instructor or an admin can modify this course",
        ))
    }
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_course(
        db: &PgPool,
        actor: &AuthUser,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let instructor_id = match dto.instructor_id {
            Some(id) => Some(id),
            None if actor.role == UserRole::Instructor => Some(actor.user_id),
            None => None,
        };
        if let Some(id) = instructor_id {
            ensure_instructor(db, id).await?;
        }

        if (dto.is_approved || dto.approved_by.is_some()) && !actor.is_admin() {
            return Err(AppError::forbidden("Only admins can approve courses"));
        }
        if let Some(admin_id) = dto.approved_by {
            ensure_admin(db, admin_id).await?;
        }

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (course_code, title, description, instructor_id, price, level,
                                  tags, photo, is_approved, approved_by, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(generate_course_code(&dto.tags))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(instructor_id)
        .bind(dto.price)
        .bind(&dto.level)
        .bind(&dto.tags)
        .bind(&dto.photo)
        .bind(dto.is_approved)
        .bind(dto.approved_by)
        .bind(dto.status.unwrap_or(CourseStatus::Published))
        .fetch_one(db)
        .await?;

        learnhub_observability::track_course_created();
        tracing::info!(course_id = %course.id, code = %course.course_code, "Course created");
        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        filters: CourseFilterParams,
    ) -> Result<Page<Course>, AppError> {
        let limit = filters.pagination.limit_or(DEFAULT_COURSE_LIMIT);
        let page = filters.pagination.page();

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        apply_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {COURSE_COLUMNS} FROM courses"));
        apply_filters(&mut data_query, &filters);
        data_query.push(" ORDER BY created_at DESC");
        push_page(&mut data_query, limit, filters.pagination.offset(limit));
        let courses = data_query.build_query_as::<Course>().fetch_all(db).await?;

        Ok(Page {
            data: courses,
            meta: PaginationMeta::new(total, limit, page),
        })
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        actor: &AuthUser,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_can_manage(actor, &existing)?;

        if dto.touches_approval() && !actor.is_admin() {
            return Err(AppError::forbidden("Only admins can approve courses"));
        }
        if let Some(admin_id) = dto.approved_by {
            ensure_admin(db, admin_id).await?;
        }

        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET title = $1, description = $2, price = $3, level = $4, tags = $5, photo = $6,
                 is_approved = $7, approved_by = $8, status = $9, updated_at = NOW()
             WHERE id = $10
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.description.or(existing.description))
        .bind(dto.price.unwrap_or(existing.price))
        .bind(dto.level.or(existing.level))
        .bind(dto.tags.unwrap_or(existing.tags))
        .bind(dto.photo.or(existing.photo))
        .bind(dto.is_approved.unwrap_or(existing.is_approved))
        .bind(dto.approved_by.or(existing.approved_by))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    /// Soft delete: the course is unpublished.
    #[instrument(skip(db))]
    pub async fn delete_course(
        db: &PgPool,
        actor: &AuthUser,
        id: CourseId,
    ) -> Result<Course, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_can_manage(actor, &existing)?;

        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(CourseStatus::Unpublished)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(course)
    }
}

async fn ensure_instructor(db: &PgPool, id: UserId) -> Result<(), AppError> {
    UserService::find_with_role(db, id, UserRole::Instructor, "Instructor not found").await?;
    Ok(())
}

async fn ensure_admin(db: &PgPool, id: UserId) -> Result<(), AppError> {
    UserService::find_with_role(db, id, UserRole::Admin, "Admin not found").await?;
    Ok(())
}

fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &CourseFilterParams) {
    Filters::new(qb)
        .contains_ci("title", filters.title.as_deref())
        .eq("instructor_id", filters.instructor)
        .gte("price", filters.low_price)
        .lte("price", filters.high_price)
        .overlaps("tags", filters.tags.clone())
        .eq("level", filters.level.clone())
        .eq("status", filters.status);
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn course(instructor_id: Option<UserId>) -> Course {
        Course {
            id: CourseId::new(),
            course_code: "RUS-48213".into(),
            title: "Rust".into(),
            description: None,
            instructor_id,
            price: 0.0,
            level: None,
            tags: vec!["rust".into()],
            photo: None,
            is_approved: false,
            approved_by: None,
            status: CourseStatus::Published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn actor(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: UserId::new(),
            role,
        }
    }

    #[test]
    fn test_owning_instructor_can_manage() {
        let instructor = actor(UserRole::Instructor);
        assert!(can_manage(&instructor, &course(Some(instructor.user_id))));
        assert!(!can_manage(&instructor, &course(Some(UserId::new()))));
        assert!(!can_manage(&instructor, &course(None)));
    }

    #[test]
    fn test_admin_can_manage_any_course() {
        let admin = actor(UserRole::Admin);
        assert!(can_manage(&admin, &course(None)));
        assert!(can_manage(&admin, &course(Some(UserId::new()))));
    }

    #[test]
    fn test_forbidden_message() {
        let student = actor(UserRole::Student);
        let err = ensure_can_manage(&student, &course(Some(UserId::new()))).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
