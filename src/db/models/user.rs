//! User account model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User account row. The password hash and refresh-token columns never leave
/// the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub person_name: String,
    pub email: String,
    pub normalized_email: String,
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Create payload. The password is already hashed by the identity service.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub person_name: String,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
}
