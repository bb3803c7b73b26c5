//! Row accessors for the email task queue.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::error::AppError;

/// Task queues, in priority order.
///
/// Stored in PostgreSQL as the `task_queue` enum type. Critical tasks
/// are claimed before default ones regardless of age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_queue", rename_all = "lowercase")]
pub enum TaskQueue {
    Default,
    Critical,
}

/// One enqueued verification-email task.
///
/// `attempts` counts claims, so it never exceeds `max_retries + 1`;
/// `completed_at` is set at most once.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailTask {
    pub id: i64,
    pub username: String,
    pub queue: TaskQueue,
    pub attempts: i32,
    pub max_retries: i32,
    pub process_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

const TASK_COLUMNS: &str =
    "id, username, queue, attempts, max_retries, process_at, last_error, completed_at, created_at";

/// Enqueue a task.
pub async fn insert_task<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
    queue: TaskQueue,
    max_retries: i32,
    process_at: DateTime<Utc>,
) -> Result<EmailTask, AppError> {
    let task = sqlx::query_as::<_, EmailTask>(&format!(
        r#"
        INSERT INTO email_tasks (username, queue, max_retries, process_at)
        VALUES ($1, $2, $3, $4)
        RETURNING {TASK_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(queue)
    .bind(max_retries)
    .bind(process_at)
    .fetch_one(executor)
    .await?;

    Ok(task)
}

/// Claim the next due task, critical queue first.
///
/// The claim is a single statement: `FOR UPDATE SKIP LOCKED` keeps
/// concurrent workers off each other's tasks, and the attempt counter
/// is incremented in the same statement that takes the claim. Tasks
/// whose retry budget is spent are never claimed again.
pub async fn claim_next_task<'e>(
    executor: impl PgExecutor<'e>,
) -> Result<Option<EmailTask>, AppError> {
    let task = sqlx::query_as::<_, EmailTask>(&format!(
        r#"
        UPDATE email_tasks
        SET attempts = attempts + 1
        WHERE id = (
            SELECT id
            FROM email_tasks
            WHERE completed_at IS NULL
              AND process_at <= now()
              AND attempts <= max_retries
            ORDER BY (queue = 'critical'::task_queue) DESC, process_at
            LIMIT 1
            FOR UPDATE SKIP LOCKED
        )
        RETURNING {TASK_COLUMNS}
        "#
    ))
    .fetch_optional(executor)
    .await?;

    Ok(task)
}

/// Mark a task completed.
pub async fn complete_task<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<(), AppError> {
    sqlx::query("UPDATE email_tasks SET completed_at = now() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Push a failed task back into the queue for a later attempt.
pub async fn reschedule_task<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
    process_at: DateTime<Utc>,
    last_error: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE email_tasks SET process_at = $1, last_error = $2 WHERE id = $3")
        .bind(process_at)
        .bind(last_error)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Record the final failure of a task whose retry budget is spent.
///
/// Sets `completed_at` alongside the error: dead tasks must leave the
/// pending set, or the partial index keeps feeding them to every claim
/// scan.
pub async fn record_task_failure<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
    last_error: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE email_tasks SET last_error = $1, completed_at = now() WHERE id = $2")
        .bind(last_error)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
