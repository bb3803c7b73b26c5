//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Currency`: the supported currency codes
//! - `Account`: database entity representing a bank account
//! - Request/response types for the account endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported currencies.
///
/// Stored in PostgreSQL as the `currency` enum type. The currency of an
/// account is fixed at creation; transfers require both accounts to use
/// the same currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cad,
    Eur,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Currency::Usd => "USD",
            Currency::Cad => "CAD",
            Currency::Eur => "EUR",
        };
        f.write_str(code)
    }
}

/// Represents an account record from the database.
///
/// # Balance Storage
///
/// Balances are stored as `i64` minor currency units (cents) to avoid
/// floating-point precision issues. A `balance >= 0` CHECK constraint
/// backs the no-overdraft invariant; the balance is only mutated inside
/// the transfer operation or by explicit balance adjustments.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Account {
    /// Unique identifier. Numeric ordering of these ids defines the
    /// canonical lock order for concurrent transfers.
    pub id: i64,

    /// Username of the owning user
    pub owner: String,

    /// Current balance in minor currency units
    pub balance: i64,

    /// Currency, fixed at creation
    pub currency: Currency,

    pub created_at: DateTime<Utc>,
}

/// Request body for creating a new account.
///
/// The owner is taken from the authenticated principal, never from the
/// request. Each user may hold at most one account per currency.
///
/// # JSON Example
///
/// ```json
/// { "currency": "USD" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub currency: Currency,
}

/// Request body for a direct balance adjustment (banker only).
///
/// `amount` is a signed delta in minor currency units; a negative delta
/// that would take the balance below zero is rejected.
#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    pub amount: i64,
}
