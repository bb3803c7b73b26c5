//! Transfer data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::account::{Account, Currency};
use crate::models::entry::Entry;

/// Represents a transfer record from the database.
///
/// A transfer is immutable: it records that `amount` moved from
/// `from_account_id` to `to_account_id`. The two accompanying ledger
/// entries and both balance updates are written in the same database
/// transaction, so either all of them are visible or none are.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transfer {
    pub id: i64,

    pub from_account_id: i64,

    pub to_account_id: i64,

    /// Amount moved, in minor currency units. Always positive; the sign
    /// of each side lives on the ledger entries.
    pub amount: i64,

    pub created_at: DateTime<Utc>,
}

/// Request body for creating a transfer.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_account_id": 1,
///   "to_account_id": 2,
///   "amount": 100,
///   "currency": "USD"
/// }
/// ```
///
/// # Validation
///
/// - `from_account_id` must belong to the authenticated user
/// - both accounts must use `currency`
/// - `amount` must be positive and the accounts distinct
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub currency: Currency,
}

/// Response body for a completed transfer: the transfer row, both
/// updated account snapshots, and both ledger entries, all read within
/// the transaction that produced them.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}
