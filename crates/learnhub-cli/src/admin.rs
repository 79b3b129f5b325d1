//! Bootstrapping the first admin account.

use anyhow::{Context, anyhow, bail};
use sqlx::PgPool;

use learnhub_core::password::{hash_password, is_strong_password};
use learnhub_models::{Email, UserId, UserRole, UserStatus};

/// Checked input for [`create_admin`].
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub fullname: String,
    pub email: Email,
    pub password: String,
}

impl NewAdmin {
    pub fn new(
        username: &str,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Self> {
        let username = username.trim();
        if !(3..=50).contains(&username.chars().count()) {
            bail!("Username must be between 3 and 50 characters");
        }

        let fullname = fullname.trim();
        if !(1..=100).contains(&fullname.chars().count()) {
            bail!("Fullname must be between 1 and 100 characters");
        }

        let email = Email::new(email)?;

        if !is_strong_password(password) {
            bail!(
                "Password is invalid: use at least 8 characters with upper and lower case \
                 letters, a digit and a symbol"
            );
        }

        Ok(Self {
            username: username.to_string(),
            fullname: fullname.to_string(),
            email,
            password: password.to_string(),
        })
    }
}

/// Inserts an active admin. Fails if the email or username is taken.
pub async fn create_admin(db: &PgPool, admin: &NewAdmin) -> anyhow::Result<UserId> {
    let hashed_password =
        hash_password(&admin.password).map_err(|e| anyhow!("Failed to hash password: {e}"))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, password, fullname, role, status)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(&admin.username)
    .bind(admin.email.as_str())
    .bind(&hashed_password)
    .bind(&admin.fullname)
    .bind(UserRole::Admin)
    .bind(UserStatus::Active)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    user_id.ok_or_else(|| anyhow!("A user with this email or username already exists"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin_normalizes_email() {
        let admin = NewAdmin::new(" root ", "Site Admin", " Admin@Example.com", "Abc123!@").unwrap();
        assert_eq!(admin.username, "root");
        assert_eq!(admin.email.as_str(), "admin@example.com");
    }

    #[test]
    fn test_new_admin_rejects_weak_password() {
        let err = NewAdmin::new("root", "Site Admin", "admin@example.com", "password").unwrap_err();
        assert!(err.to_string().starts_with("Password is invalid"));
    }

    #[test]
    fn test_new_admin_rejects_bad_fields() {
        assert!(NewAdmin::new("ro", "Site Admin", "admin@example.com", "Abc123!@").is_err());
        assert!(NewAdmin::new("root", " ", "admin@example.com", "Abc123!@").is_err());
        assert!(NewAdmin::new("root", "Site Admin", "not-an-email", "Abc123!@").is_err());
    }
}
