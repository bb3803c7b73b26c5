//! Email-verification record data model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single-use, time-bounded credential proving control of an email
/// address.
///
/// Created by the email worker when it delivers a verification mail;
/// consumed exactly once by the email-verification operation. Expiry is
/// enforced by the check at verification time, never by mutating the
/// row: an expired record stays `is_used = false` in storage.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct VerifyEmail {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub secret_code: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}
