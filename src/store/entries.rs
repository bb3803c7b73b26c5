//! Row accessors for ledger entries.

use sqlx::PgExecutor;

use crate::{error::AppError, models::entry::Entry};

/// Insert one ledger entry.
///
/// `amount` is the signed delta this entry records for `account_id`:
/// negative for the debit side of a transfer, positive for the credit
/// side.
pub async fn create_entry<'e>(
    executor: impl PgExecutor<'e>,
    account_id: i64,
    amount: i64,
) -> Result<Entry, AppError> {
    let entry = sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO entries (account_id, amount)
        VALUES ($1, $2)
        RETURNING id, account_id, amount, created_at
        "#,
    )
    .bind(account_id)
    .bind(amount)
    .fetch_one(executor)
    .await?;

    Ok(entry)
}

/// List all entries for one account, newest first.
pub async fn list_account_entries<'e>(
    executor: impl PgExecutor<'e>,
    account_id: i64,
) -> Result<Vec<Entry>, AppError> {
    let entries = sqlx::query_as::<_, Entry>(
        r#"
        SELECT id, account_id, amount, created_at
        FROM entries
        WHERE account_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}
