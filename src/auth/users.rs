//! User records and their database operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A user row.
///
/// `password_hash` is `None` for accounts created through the social-login
/// exchange; such accounts cannot log in with credentials until a password
/// reset sets one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub color: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub facebook_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub color: String,
    pub password_hash: Option<String>,
    pub facebook_id: Option<String>,
}

const USER_COLUMNS: &str =
    "id, email, name, role, color, password_hash, facebook_id, created_at, updated_at";

/// Insert a new user and return the stored row.
pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, color, password_hash, facebook_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, name, role, color, password_hash, facebook_id, created_at, updated_at
        "#,
    )
    .bind(&new_user.email)
    .bind(&new_user.name)
    .bind(&new_user.color)
    .bind(&new_user.password_hash)
    .bind(&new_user.facebook_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn get_user_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_facebook_id(
    pool: &PgPool,
    facebook_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE facebook_id = $1"
    ))
    .bind(facebook_id)
    .fetch_optional(pool)
    .await
}

/// Replace a user's password hash.
pub async fn update_password(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
