//! Row accessors for accounts.
//!
//! Every accessor is generic over the executor, so the same function
//! runs against the pool or bound to an open transaction.

use sqlx::PgExecutor;

use crate::{
    error::AppError,
    models::account::{Account, Currency},
};

pub struct CreateAccountParams {
    pub owner: String,
    pub currency: Currency,
    pub balance: i64,
}

/// Insert a new account.
///
/// A duplicate (owner, currency) pair surfaces as `Conflict` through the
/// unique constraint.
pub async fn create_account<'e>(
    executor: impl PgExecutor<'e>,
    params: &CreateAccountParams,
) -> Result<Account, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (owner, currency, balance)
        VALUES ($1, $2, $3)
        RETURNING id, owner, balance, currency, created_at
        "#,
    )
    .bind(&params.owner)
    .bind(params.currency)
    .bind(params.balance)
    .fetch_one(executor)
    .await?;

    Ok(account)
}

/// Fetch one account by id.
pub async fn get_account<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<Account, AppError> {
    sqlx::query_as::<_, Account>(
        "SELECT id, owner, balance, currency, created_at FROM accounts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("account {id} not found")))
}

/// List all accounts owned by one user, newest first.
pub async fn list_accounts<'e>(
    executor: impl PgExecutor<'e>,
    owner: &str,
) -> Result<Vec<Account>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, owner, balance, currency, created_at
        FROM accounts
        WHERE owner = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner)
    .fetch_all(executor)
    .await?;

    Ok(accounts)
}

/// Apply a signed delta to an account balance in one statement.
///
/// The UPDATE takes the row lock and applies the delta atomically, so
/// no read-modify-write window exists. A delta that would take the
/// balance below zero trips the CHECK constraint and surfaces as
/// `Invalid`; a missing account surfaces as `NotFound`.
pub async fn add_account_balance<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
    delta: i64,
) -> Result<Account, AppError> {
    sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET balance = balance + $1
        WHERE id = $2
        RETURNING id, owner, balance, currency, created_at
        "#,
    )
    .bind(delta)
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("account {id} not found")))
}

/// Delete an account.
///
/// Accounts with ledger history are protected by foreign keys; the
/// violation surfaces as `Conflict`.
pub async fn delete_account<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("account {id} not found")));
    }

    Ok(())
}
