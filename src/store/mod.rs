//! Transactional store - the core of the service.
//!
//! `Store` wraps the connection pool and exposes:
//!
//! - `with_transaction`: the generic run-in-one-database-transaction
//!   wrapper every composite operation is built on
//! - row accessors, one module per entity, generic over the executor so
//!   the same function serves pool-level reads and transaction-scoped
//!   writes
//! - the three composite operations: [`Store::transfer_tx`],
//!   [`Store::create_user_tx`], and [`Store::verify_email_tx`]
//!
//! # Atomicity Guarantees
//!
//! Every composite operation runs inside exactly one PostgreSQL
//! transaction. Correctness under concurrency comes entirely from the
//! database's transactional isolation and row locks; the store holds no
//! in-process locks and no process-wide mutable state.

pub mod accounts;
pub mod create_user_tx;
pub mod entries;
pub mod retry;
pub mod sessions;
pub mod transfer_tx;
pub mod transfers;
pub mod users;
pub mod verify_email_tx;
pub mod verify_emails;

use futures::future::BoxFuture;
use sqlx::{Postgres, Transaction};

use crate::{db::DbPool, error::AppError};

/// An open database transaction, handed to units of work.
pub type PgTx = Transaction<'static, Postgres>;

/// Provides all functions to execute queries and composite transactions.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The shared connection pool, for pool-level (non-transactional) reads.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Execute a unit of work inside one database transaction.
    ///
    /// The unit of work is invoked exactly once with the transaction
    /// handle; every accessor driven through that handle is
    /// transaction-scoped and sees the transaction's isolation snapshot.
    ///
    /// # Contract
    ///
    /// - On success the transaction is committed; a commit failure is
    ///   returned as the operation's failure, and callers must treat it
    ///   identically to a work failure (no partial effects applied).
    /// - On failure the transaction is rolled back and the original
    ///   failure returned. If the rollback itself fails, both errors are
    ///   reported together as [`AppError::RollbackFailed`].
    /// - No retry happens here; retry-on-conflict is caller policy
    ///   (see [`retry`]).
    ///
    /// Dropping the returned future before commit (e.g. through a
    /// timeout) releases the transaction handle, and sqlx rolls the
    /// transaction back on drop, so cancellation never leaves a
    /// transaction open.
    pub async fn with_transaction<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: for<'t> FnOnce(&'t mut PgTx) -> BoxFuture<'t, Result<T, AppError>>,
    {
        let mut tx = self.pool.begin().await?;

        match work(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(cause) => match tx.rollback().await {
                Ok(()) => Err(cause),
                Err(rollback) => Err(AppError::RollbackFailed {
                    cause: Box::new(cause),
                    rollback,
                }),
            },
        }
    }
}
