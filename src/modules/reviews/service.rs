use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use learnhub_core::{AppError, Page, PaginationMeta};
use learnhub_db::Filters;
use learnhub_db::filters::push_page;

use crate::middleware::auth::AuthUser;
use crate::modules::courses::CourseService;
use crate::modules::reviews::model::{
    CreateReviewDto, Review, ReviewFilterParams, ReviewId, ReviewWithDetails, UpdateReviewDto,
};

pub const DEFAULT_REVIEW_LIMIT: i64 = 10;

const REVIEW_COLUMNS: &str = "id, user_id, course_id, rating, comment, created_at, updated_at";

const REVIEW_DETAILS_SELECT: &str = "SELECT r.id, r.user_id, r.course_id, r.rating, r.comment, \
     r.created_at, r.updated_at, u.fullname AS author_fullname, c.title AS course_title \
     FROM reviews r \
     JOIN users u ON u.id = r.user_id \
     JOIN courses c ON c.id = r.course_id";

const REVIEW_DETAILS_COUNT: &str = "SELECT COUNT(*) FROM reviews r \
     JOIN users u ON u.id = r.user_id \
     JOIN courses c ON c.id = r.course_id";

fn ensure_author_or_admin(actor: &AuthUser, review: &Review) -> Result<(), AppError> {
    if actor.owns_or_admin(review.user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the review author or an admin can modify this review",
        ))
    }
}

pub struct ReviewService;

impl ReviewService {
    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create_review(
        db: &PgPool,
        actor: &AuthUser,
        dto: CreateReviewDto,
    ) -> Result<Review, AppError> {
        let course = CourseService::find_by_id(db, dto.course_id).await?;

        let review = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (user_id, course_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(actor.user_id)
        .bind(course.id)
        .bind(dto.rating)
        .bind(&dto.comment)
        .fetch_one(db)
        .await?;

        Ok(review)
    }

    #[instrument(skip(db))]
    pub async fn list_reviews(
        db: &PgPool,
        filters: ReviewFilterParams,
    ) -> Result<Page<ReviewWithDetails>, AppError> {
        let limit = filters.pagination.limit_or(DEFAULT_REVIEW_LIMIT);
        let page = filters.pagination.page();

        let mut count_query = QueryBuilder::new(REVIEW_DETAILS_COUNT);
        apply_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(REVIEW_DETAILS_SELECT);
        apply_filters(&mut data_query, &filters);
        data_query.push(" ORDER BY r.created_at DESC");
        push_page(&mut data_query, limit, filters.pagination.offset(limit));
        let reviews = data_query
            .build_query_as::<ReviewWithDetails>()
            .fetch_all(db)
            .await?;

        Ok(Page {
            data: reviews,
            meta: PaginationMeta::new(total, limit, page),
        })
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: ReviewId) -> Result<ReviewWithDetails, AppError> {
        sqlx::query_as::<_, ReviewWithDetails>(&format!("{REVIEW_DETAILS_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found"))
    }

    async fn find_review(db: &PgPool, id: ReviewId) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(&format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_review(
        db: &PgPool,
        actor: &AuthUser,
        id: ReviewId,
        dto: UpdateReviewDto,
    ) -> Result<Review, AppError> {
        let existing = Self::find_review(db, id).await?;
        ensure_author_or_admin(actor, &existing)?;

        let review = sqlx::query_as::<_, Review>(&format!(
            "UPDATE reviews SET rating = $1, comment = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(dto.rating.unwrap_or(existing.rating))
        .bind(dto.comment.unwrap_or(existing.comment))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(review)
    }

    /// Reviews are removed outright.
    #[instrument(skip(db))]
    pub async fn delete_review(
        db: &PgPool,
        actor: &AuthUser,
        id: ReviewId,
    ) -> Result<Review, AppError> {
        let existing = Self::find_review(db, id).await?;
        ensure_author_or_admin(actor, &existing)?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(existing)
    }
}

fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ReviewFilterParams) {
    Filters::new(qb)
        .eq("r.course_id", filters.course)
        .eq("r.user_id", filters.user)
        .eq("r.rating", filters.rating);
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use learnhub_models::{CourseId, UserId, UserRole};

    use super::*;

    fn review_by(author: UserId) -> Review {
        Review {
            id: ReviewId::new(),
            user_id: author,
            course_id: CourseId::new(),
            rating: 4,
            comment: "Clear and practical".into(),
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
    fn test_author_may_modify_own_review() {
        let author = actor(UserRole::Student);
        assert!(ensure_author_or_admin(&author, &review_by(author.user_id)).is_ok());
    }

    #[test]
    fn test_admin_may_modify_any_review() {
        let admin = actor(UserRole::Admin);
        assert!(ensure_author_or_admin(&admin, &review_by(UserId::new())).is_ok());
    }

    #[test]
    fn test_other_users_are_forbidden() {
        for role in [UserRole::Student, UserRole::Instructor] {
            let err = ensure_author_or_admin(&actor(role), &review_by(UserId::new())).unwrap_err();
            assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
        }
    }
}
