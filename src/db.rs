//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool is the only resource shared between concurrent operation
/// calls; connections are created lazily and reused across requests.
/// The cap accommodates many in-flight transfers holding a transaction
/// each, plus the email worker.
///
/// # Errors
///
/// Returns an error if the connection string is invalid, the server is
/// unreachable, or authentication fails.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Executes all SQL migration files in order. Migrations are tracked in
/// the `_sqlx_migrations` table, so each migration runs only once.
///
/// # Migration Files
///
/// Migration files live in `migrations/` with format
/// `<timestamp>_<name>.sql` and are embedded at compile time.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
