//! Ledger entry data model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One side of a transfer's effect on one account.
///
/// `amount` is the signed delta applied to the account's balance at the
/// moment of creation: negative for the debit side, positive for the
/// credit side. Entries are immutable once written; each transfer
/// produces exactly one debit entry and one credit entry of equal
/// magnitude.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Entry {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
