//! Identity service
//!
//! Account creation, lookups and credential verification on top of the user
//! repository. Password policy enforcement lives here, not in the handlers.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::{PasswordPolicy, hash_password, verify_password};
use crate::db::models::{User, UserCreate};
use crate::db::repository::user as user_repo;
use crate::utils::AppError;

/// Registration data, already shape-validated at the boundary.
#[derive(Debug, Clone)]
pub struct Registration {
    pub person_name: String,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub password: String,
}

#[derive(Clone)]
pub struct IdentityService {
    pool: SqlitePool,
    policy: PasswordPolicy,
}

impl IdentityService {
    pub fn new(pool: SqlitePool, policy: PasswordPolicy) -> Self {
        Self { pool, policy }
    }

    /// Create an account. Policy violations are collected and joined into a
    /// single validation message; duplicate email/username is a conflict.
    pub async fn register(&self, data: Registration) -> Result<User, AppError> {
        let policy_errors = self.policy.check(&data.password);
        if !policy_errors.is_empty() {
            return Err(AppError::Validation(policy_errors.join(",")));
        }

        let password_hash = hash_password(&data.password)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = user_repo::create(
            &self.pool,
            UserCreate {
                person_name: data.person_name,
                email: data.email,
                username: data.username,
                phone_number: data.phone_number,
                password_hash,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(user_repo::find_by_id(&self.pool, id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(user_repo::find_by_email(&self.pool, email).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(user_repo::find_by_username(&self.pool, username).await?)
    }

    /// True when NO account uses the email. The inverted polarity is the
    /// contract of the email-availability endpoint; keep it.
    pub async fn is_email_available(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.find_by_email(email).await?.is_none())
    }

    /// Verify credentials, returning the account on success. A missing user
    /// and a wrong password are indistinguishable (both `None`): callers get
    /// no enumeration signal and this never errors on a lookup miss.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
