//! Row accessors for email-verification records.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::{error::AppError, models::verify_email::VerifyEmail};

pub struct CreateVerifyEmailParams {
    pub username: String,
    pub email: String,
    pub secret_code: String,
    pub expired_at: DateTime<Utc>,
}

const VERIFY_EMAIL_COLUMNS: &str =
    "id, username, email, secret_code, is_used, created_at, expired_at";

/// Insert a new verification record.
pub async fn create_verify_email<'e>(
    executor: impl PgExecutor<'e>,
    params: &CreateVerifyEmailParams,
) -> Result<VerifyEmail, AppError> {
    let record = sqlx::query_as::<_, VerifyEmail>(&format!(
        r#"
        INSERT INTO verify_emails (username, email, secret_code, expired_at)
        VALUES ($1, $2, $3, $4)
        RETURNING {VERIFY_EMAIL_COLUMNS}
        "#
    ))
    .bind(&params.username)
    .bind(&params.email)
    .bind(&params.secret_code)
    .bind(params.expired_at)
    .fetch_one(executor)
    .await?;

    Ok(record)
}

/// Fetch the record matching (username, secret_code), taking its row
/// lock so concurrent verification attempts serialize.
///
/// Returns `None` when nothing matches; the caller decides how much to
/// disclose about why.
pub async fn get_verify_email_for_update<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
    secret_code: &str,
) -> Result<Option<VerifyEmail>, AppError> {
    let record = sqlx::query_as::<_, VerifyEmail>(&format!(
        r#"
        SELECT {VERIFY_EMAIL_COLUMNS}
        FROM verify_emails
        WHERE username = $1 AND secret_code = $2
        FOR UPDATE
        "#
    ))
    .bind(username)
    .bind(secret_code)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}

/// Mark a verification record used. The flag is terminal.
pub async fn mark_verify_email_used<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<VerifyEmail, AppError> {
    sqlx::query_as::<_, VerifyEmail>(&format!(
        r#"
        UPDATE verify_emails
        SET is_used = true
        WHERE id = $1
        RETURNING {VERIFY_EMAIL_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound("verification record not found".to_string()))
}
