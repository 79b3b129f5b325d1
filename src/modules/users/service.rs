use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use learnhub_core::{AppError, Page, PaginationMeta, hash_password, validate_password_strength};
use learnhub_db::Filters;
use learnhub_db::filters::push_page;
use learnhub_models::Email;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{
    CreateUserDto, USER_COLUMNS, UpdateUserDto, User, UserFilterParams, UserId, UserRecord,
    UserRole, UserStatus,
};

pub const DEFAULT_USER_LIMIT: i64 = 10;

/// Every `users` column, for [`UserRecord`].
pub(crate) const USER_RECORD_COLUMNS: &str = "id, username, email, fullname, role, status, \
     enrolled_courses, created_at, updated_at, password, refresh_token, verify_code, \
     verify_code_expires_at, reset_password_code, reset_password_expires_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    #[instrument(skip(db))]
    pub async fn find_record_by_id(db: &PgPool, id: UserId) -> Result<Option<UserRecord>, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_RECORD_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(record)
    }

    #[instrument(skip(db))]
    pub async fn find_record_by_email(
        db: &PgPool,
        email: &Email,
    ) -> Result<Option<UserRecord>, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_RECORD_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(db)
        .await?;

        Ok(record)
    }

    /// Rejects an email or username already used by another account. Email is
    /// checked first.
    #[instrument(skip(db))]
    pub async fn ensure_unique(
        db: &PgPool,
        email: Option<&Email>,
        username: Option<&str>,
        except: Option<UserId>,
    ) -> Result<(), AppError> {
        if let Some(email) = email {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(email.as_str())
            .bind(except)
            .fetch_one(db)
            .await?;
            if taken {
                return Err(AppError::bad_request("Email already exists"));
            }
        }

        if let Some(username) = username {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(username)
            .bind(except)
            .fetch_one(db)
            .await?;
            if taken {
                return Err(AppError::bad_request("Username already exists"));
            }
        }

        Ok(())
    }

    /// Admin creation path: the account is active immediately.
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        validate_password_strength(&dto.password)?;
        let email = Email::new(&dto.email).map_err(AppError::bad_request)?;

        Self::ensure_unique(db, Some(&email), Some(&dto.username), None).await?;

        let hashed_password = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or_default();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, fullname, role, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(email.as_str())
        .bind(&hashed_password)
        .bind(&dto.fullname)
        .bind(role)
        .bind(UserStatus::Active)
        .fetch_one(db)
        .await
        .map_err(map_unique_violation)?;

        learnhub_observability::track_user_registered(role.as_str());
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool, filters: UserFilterParams) -> Result<Page<User>, AppError> {
        let limit = filters.pagination.limit_or(DEFAULT_USER_LIMIT);
        let page = filters.pagination.page();

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM users");
        apply_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        apply_filters(&mut data_query, &filters);
        data_query.push(" ORDER BY created_at DESC");
        push_page(&mut data_query, limit, filters.pagination.offset(limit));
        let users = data_query.build_query_as::<User>().fetch_all(db).await?;

        Ok(Page {
            data: users,
            meta: PaginationMeta::new(total, limit, page),
        })
    }

    /// Profile update by the user themselves or an admin. Role, status and
    /// enrolled courses can only be changed by an admin.
    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        actor: &AuthUser,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let existing = Self::find_by_id(db, id).await?;

        if !actor.owns_or_admin(existing.id) {
            return Err(AppError::forbidden("You are not allowed to update this user"));
        }
        if dto.touches_admin_fields() && !actor.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can change role, status or enrolled courses",
            ));
        }

        let hashed_password = match dto.password.as_deref() {
            Some(password) => {
                validate_password_strength(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let email = dto
            .email
            .as_deref()
            .map(Email::new)
            .transpose()
            .map_err(AppError::bad_request)?;
        Self::ensure_unique(db, email.as_ref(), dto.username.as_deref(), Some(id)).await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET username = $1, email = $2, fullname = $3, role = $4, status = $5,
                 enrolled_courses = $6, password = COALESCE($7, password), updated_at = NOW()
             WHERE id = $8
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.username.unwrap_or(existing.username))
        .bind(email.map(Email::into_inner).unwrap_or(existing.email))
        .bind(dto.fullname.unwrap_or(existing.fullname))
        .bind(dto.role.unwrap_or(existing.role))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.enrolled_courses.unwrap_or(existing.enrolled_courses))
        .bind(hashed_password)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Soft delete: the account is blocked and its session revoked.
    #[instrument(skip(db))]
    pub async fn block_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET status = $1, refresh_token = NULL, updated_at = NOW()
             WHERE id = $2
             RETURNING {USER_COLUMNS}"
        ))
        .bind(UserStatus::Block)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Looks up a user and checks their role, for instructor and approver references.
    #[instrument(skip(db))]
    pub async fn find_with_role(
        db: &PgPool,
        id: UserId,
        role: UserRole,
        not_found: &'static str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = $2"
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(not_found))?;

        Ok(user)
    }
}

fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &UserFilterParams) {
    Filters::new(qb)
        .contains_ci("email", filters.email.as_deref())
        .contains_ci("username", filters.username.as_deref())
        .contains_ci("fullname", filters.fullname.as_deref())
        .eq("role", filters.role)
        .eq("status", filters.status)
        .array_contains("enrolled_courses", filters.course_id);
}

/// Maps a unique violation on `users` to the matching 400; anything else is unexpected.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return match db_err.constraint() {
            Some("users_username_key") => AppError::bad_request("Username already exists"),
            _ => AppError::bad_request("Email already exists"),
        };
    }
    AppError::from(e)
}
