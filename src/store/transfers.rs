//! Row accessors for transfers.

use sqlx::PgExecutor;

use crate::{error::AppError, models::transfer::Transfer};

/// Insert one transfer row.
pub async fn create_transfer<'e>(
    executor: impl PgExecutor<'e>,
    from_account_id: i64,
    to_account_id: i64,
    amount: i64,
) -> Result<Transfer, AppError> {
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"
        INSERT INTO transfers (from_account_id, to_account_id, amount)
        VALUES ($1, $2, $3)
        RETURNING id, from_account_id, to_account_id, amount, created_at
        "#,
    )
    .bind(from_account_id)
    .bind(to_account_id)
    .bind(amount)
    .fetch_one(executor)
    .await?;

    Ok(transfer)
}

/// Fetch one transfer by id.
pub async fn get_transfer<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Transfer, AppError> {
    sqlx::query_as::<_, Transfer>(
        r#"
        SELECT id, from_account_id, to_account_id, amount, created_at
        FROM transfers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("transfer {id} not found")))
}

/// List all transfers touching one account (either side), newest first.
pub async fn list_account_transfers<'e>(
    executor: impl PgExecutor<'e>,
    account_id: i64,
) -> Result<Vec<Transfer>, AppError> {
    let transfers = sqlx::query_as::<_, Transfer>(
        r#"
        SELECT id, from_account_id, to_account_id, amount, created_at
        FROM transfers
        WHERE from_account_id = $1 OR to_account_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(executor)
    .await?;

    Ok(transfers)
}
