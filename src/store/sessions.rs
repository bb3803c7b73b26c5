//! Row accessors for sessions.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{error::AppError, models::session::Session};

pub struct CreateSessionParams {
    /// The token id embedded in the refresh token
    pub id: Uuid,
    pub username: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub expires_at: DateTime<Utc>,
}

const SESSION_COLUMNS: &str =
    "id, username, refresh_token, user_agent, client_ip, is_blocked, expires_at, created_at";

/// Insert a new session at login.
pub async fn create_session<'e>(
    executor: impl PgExecutor<'e>,
    params: &CreateSessionParams,
) -> Result<Session, AppError> {
    let session = sqlx::query_as::<_, Session>(&format!(
        r#"
        INSERT INTO sessions (id, username, refresh_token, user_agent, client_ip, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(params.id)
    .bind(&params.username)
    .bind(&params.refresh_token)
    .bind(&params.user_agent)
    .bind(&params.client_ip)
    .bind(params.expires_at)
    .fetch_one(executor)
    .await?;

    Ok(session)
}

/// Fetch one session by id.
pub async fn get_session<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Session, AppError> {
    sqlx::query_as::<_, Session>(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound("session not found".to_string()))
}

/// Block a session. The flag latches: there is no unblock.
pub async fn block_session<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE sessions SET is_blocked = true WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
