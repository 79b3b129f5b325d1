use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use learnhub_core::{AppError, Page, PaginationMeta};
use learnhub_db::Filters;
use learnhub_db::filters::push_page;

use crate::modules::courses::CourseService;
use crate::modules::payments::model::{
    CreatePaymentDto, PAYMENT_COLUMNS, Payment, PaymentFilterParams, PaymentId, PaymentStatus,
    UpdatePaymentDto,
};
use crate::modules::users::UserService;

pub const DEFAULT_PAYMENT_LIMIT: i64 = 10;

pub struct PaymentService;

impl PaymentService {
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id, course_id = %dto.course_id))]
    pub async fn create_payment(db: &PgPool, dto: CreatePaymentDto) -> Result<Payment, AppError> {
        let user = UserService::find_by_id(db, dto.user_id).await?;
        let course = CourseService::find_by_id(db, dto.course_id).await?;

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (user_id, course_id, amount, currency, method, status, transaction_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(user.id)
        .bind(course.id)
        .bind(dto.amount)
        .bind(dto.currency_code())
        .bind(&dto.method)
        .bind(dto.status.unwrap_or(PaymentStatus::Pending))
        .bind(&dto.transaction_id)
        .fetch_one(db)
        .await?;

        Ok(payment)
    }

    #[instrument(skip(db))]
    pub async fn list_payments(
        db: &PgPool,
        filters: PaymentFilterParams,
    ) -> Result<Page<Payment>, AppError> {
        let limit = filters.pagination.limit_or(DEFAULT_PAYMENT_LIMIT);
        let page = filters.pagination.page();

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM payments");
        apply_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {PAYMENT_COLUMNS} FROM payments"));
        apply_filters(&mut data_query, &filters);
        data_query.push(" ORDER BY created_at DESC");
        push_page(&mut data_query, limit, filters.pagination.offset(limit));
        let payments = data_query.build_query_as::<Payment>().fetch_all(db).await?;

        Ok(Page {
            data: payments,
            meta: PaginationMeta::new(total, limit, page),
        })
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: PaymentId) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Payment not found"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_payment(
        db: &PgPool,
        id: PaymentId,
        dto: UpdatePaymentDto,
    ) -> Result<Payment, AppError> {
        let existing = Self::find_by_id(db, id).await?;

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments
             SET amount = $1, currency = $2, method = $3, status = $4, transaction_id = $5,
                 updated_at = NOW()
             WHERE id = $6
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(dto.amount.unwrap_or(existing.amount))
        .bind(
            dto.currency
                .map(|currency| currency.to_uppercase())
                .unwrap_or(existing.currency),
        )
        .bind(dto.method.unwrap_or(existing.method))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.transaction_id.or(existing.transaction_id))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(payment)
    }

    /// Soft delete: status becomes `deleted`.
    #[instrument(skip(db))]
    pub async fn delete_payment(db: &PgPool, id: PaymentId) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(PaymentStatus::Deleted)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Payment not found"))
    }
}

fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &PaymentFilterParams) {
    Filters::new(qb)
        .eq("user_id", filters.user)
        .eq("course_id", filters.course)
        .eq("status", filters.status)
        .eq("method", filters.method.clone())
        .gte("amount", filters.min_amount)
        .lte("amount", filters.max_amount);
}
