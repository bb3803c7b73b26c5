//! Token issuance and verification.
//!
//! `TokenMaker` is the seam between the HTTP layer and the concrete
//! token scheme; [`jwt::JwtTokenMaker`] is the HS256 implementation
//! used in production.

pub mod jwt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::user::UserRole};

/// Why a token failed to mint or verify.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    /// The signing secret is too short. Raised at construction, never
    /// at request time.
    #[error("invalid key size: secret must be at least 32 bytes")]
    InvalidKeySize,
}

/// At the API boundary every token failure is an authentication failure.
impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// The claims carried by every token.
///
/// `id` is unique per token; the refresh token's id doubles as the
/// session identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl TokenPayload {
    pub fn new(username: String, role: UserRole, duration: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            role,
            issued_at,
            expired_at: issued_at + duration,
        }
    }
}

/// Interface for managing tokens.
pub trait TokenMaker: Send + Sync {
    /// Mint a token for a username and role, valid for `duration`.
    /// Returns the signed token alongside its payload.
    fn create_token(
        &self,
        username: &str,
        role: UserRole,
        duration: Duration,
    ) -> Result<(String, TokenPayload), TokenError>;

    /// Check a token's signature and expiry and recover its payload.
    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError>;
}
