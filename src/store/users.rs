//! Row accessors for users.

use sqlx::PgExecutor;

use crate::{
    error::AppError,
    models::user::{User, UserRole},
};

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub hashed_password: String,
    pub full_name: String,
    pub email: String,
}

const USER_COLUMNS: &str =
    "username, hashed_password, full_name, email, role, is_email_verified, \
     password_changed_at, created_at";

/// Insert a new user.
///
/// A duplicate username or email surfaces as `Conflict` through the
/// unique constraints.
pub async fn create_user<'e>(
    executor: impl PgExecutor<'e>,
    params: &CreateUserParams,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, hashed_password, full_name, email)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&params.username)
    .bind(&params.hashed_password)
    .bind(&params.full_name)
    .bind(&params.email)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

/// Fetch one user by username.
pub async fn get_user<'e>(executor: impl PgExecutor<'e>, username: &str) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))
}

/// Update a user's role.
pub async fn update_user_role<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
    role: UserRole,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET role = $1
        WHERE username = $2
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(role)
    .bind(username)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))
}

/// Flip a user's `is_email_verified` flag to true.
pub async fn set_user_email_verified<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET is_email_verified = true
        WHERE username = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))
}
