//! Session data models and token-renewal request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a session record from the database.
///
/// A session is created at login and identified by the `id` embedded in
/// the refresh token it stores. `is_blocked` latches true and is never
/// reset; a blocked session can no longer renew access tokens.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Matches the token id of the refresh token issued at login
    pub id: Uuid,

    pub username: String,

    pub refresh_token: String,

    pub user_agent: String,

    pub client_ip: String,

    pub is_blocked: bool,

    /// Fixed at issuance
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Request body for renewing an access token.
#[derive(Debug, Deserialize)]
pub struct RenewAccessTokenRequest {
    pub refresh_token: String,
}

/// Response body carrying the freshly issued access token.
#[derive(Debug, Serialize)]
pub struct RenewAccessTokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}
