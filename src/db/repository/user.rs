//! User account repository

use super::{RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use crate::utils::validation::normalize_email;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT: &str = "SELECT id, person_name, email, normalized_email, username, phone_number, password_hash, refresh_token, refresh_token_expires_at, created_at FROM user_account";

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> RepoResult<Option<User>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{SELECT} WHERE normalized_email = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{SELECT} WHERE username = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a new account. Email uniqueness is checked against the normalized
/// form; the UNIQUE index backs the check up at write time.
pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Email '{}' is already taken.",
            data.email
        )));
    }
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' is already taken.",
            data.username
        )));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO user_account (id, person_name, email, normalized_email, username, phone_number, password_hash, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.person_name)
    .bind(&data.email)
    .bind(normalize_email(&data.email))
    .bind(&data.username)
    .bind(&data.phone_number)
    .bind(&data.password_hash)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Store a freshly issued refresh token on the user (login / registration).
pub async fn set_refresh_token(
    pool: &SqlitePool,
    id: Uuid,
    token: &str,
    expires_at: DateTime<Utc>,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE user_account SET refresh_token = ?, refresh_token_expires_at = ? WHERE id = ?",
    )
    .bind(token)
    .bind(expires_at)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Rotate the refresh token, guarded on the old value. The guard makes the
/// rotation first-writer-wins: a concurrent refresh with the same old token
/// sees zero affected rows and must fail.
pub async fn rotate_refresh_token(
    pool: &SqlitePool,
    id: Uuid,
    old_token: &str,
    new_token: &str,
    expires_at: DateTime<Utc>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE user_account SET refresh_token = ?, refresh_token_expires_at = ? WHERE id = ? AND refresh_token = ?",
    )
    .bind(new_token)
    .bind(expires_at)
    .bind(id)
    .bind(old_token)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Drop the stored refresh token (logout revocation).
pub async fn clear_refresh_token(pool: &SqlitePool, id: Uuid) -> RepoResult<()> {
    sqlx::query(
        "UPDATE user_account SET refresh_token = NULL, refresh_token_expires_at = NULL WHERE id = ?",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
