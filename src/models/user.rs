//! User data models, roles, and API request/response types.
//!
//! This module defines:
//! - `UserRole`: the role enum used for authorization
//! - `User`: database entity representing a user
//! - Request/response types for signup, login, role update, and email
//!   verification, including the field validation rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// User roles.
///
/// Stored in PostgreSQL as the `user_role` enum type. `Banker` is the
/// administrative role: it may update roles and adjust balances directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Depositor,
    Banker,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Depositor => f.write_str("depositor"),
            UserRole::Banker => f.write_str("banker"),
        }
    }
}

/// Represents a user record from the database.
///
/// `is_email_verified` transitions false→true exactly once, inside the
/// email-verification operation. `hashed_password` never leaves the
/// server; responses use [`UserResponse`] instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Primary key
    pub username: String,

    /// Argon2id hash, never serialized
    pub hashed_password: String,

    pub full_name: String,

    pub email: String,

    pub role: UserRole,

    pub is_email_verified: bool,

    pub password_changed_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Request body for creating a user (signup).
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "alice_01",
///   "password": "secret-password",
///   "full_name": "Alice Doe",
///   "email": "alice@example.com"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Validate all fields, reporting the first violation.
    ///
    /// # Rules
    ///
    /// - username: 3-100 chars, lowercase letters, digits, underscore
    /// - password: 6-100 chars
    /// - full name: 3-100 chars, letters and spaces only
    /// - email: must be a plausible address
    pub fn validate(&self) -> Result<(), AppError> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        validate_full_name(&self.full_name)?;
        validate_email(&self.email)?;
        Ok(())
    }
}

pub fn validate_username(username: &str) -> Result<(), AppError> {
    if !(3..=100).contains(&username.len()) {
        return Err(AppError::Invalid(
            "username must contain 3-100 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(AppError::Invalid(
            "username must contain only lowercase letters, digits, or underscore".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if !(6..=100).contains(&password.len()) {
        return Err(AppError::Invalid(
            "password must contain 6-100 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), AppError> {
    if !(3..=100).contains(&full_name.len()) {
        return Err(AppError::Invalid(
            "full name must contain 3-100 characters".to_string(),
        ));
    }
    if !full_name.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(AppError::Invalid(
            "full name must contain only letters and spaces".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid || !(3..=200).contains(&email.len()) {
        return Err(AppError::Invalid(
            "email is not a valid email address".to_string(),
        ));
    }
    Ok(())
}

/// Request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginUserRequest {
    pub username: String,
    pub password: String,
}

/// Request body for updating a user's role (banker only).
#[derive(Debug, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub username: String,
    pub role: UserRole,
}

/// Request body for verifying an email address.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub username: String,
    pub secret_code: String,
}

/// Response body for user endpoints.
///
/// Strips the password hash from the database row.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            is_email_verified: user.is_email_verified,
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginUserResponse {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            username: "alice_01".to_string(),
            password: "secret-password".to_string(),
            full_name: "Alice Doe".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("Alice").is_err());
        assert!(validate_username("alice doe").is_err());
        assert!(validate_username(&"a".repeat(101)).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(101)).is_err());
    }

    #[test]
    fn full_name_rules() {
        assert!(validate_full_name("Alice Doe").is_ok());
        assert!(validate_full_name("Alice 2nd").is_err());
        assert!(validate_full_name("Al").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
    }

    #[test]
    fn response_strips_password_hash() {
        let user = User {
            username: "alice_01".to_string(),
            hashed_password: "argon2-hash".to_string(),
            full_name: "Alice Doe".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Depositor,
            is_email_verified: false,
            password_changed_at: Utc::now(),
            created_at: Utc::now(),
        };

        let body = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!body.contains("argon2-hash"));
        assert!(body.contains("alice_01"));
    }
}
