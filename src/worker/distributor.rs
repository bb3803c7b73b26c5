//! Task distribution - enqueueing verification-email tasks.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::{db::DbPool, error::AppError, worker::tasks, worker::tasks::TaskQueue};

/// Payload of a verification-email task.
#[derive(Debug, Clone, Serialize)]
pub struct SendVerifyEmailPayload {
    pub username: String,
}

/// Queue, retry budget, and initial delay for one task.
#[derive(Debug, Clone, Copy)]
pub struct TaskOptions {
    pub queue: TaskQueue,
    pub max_retries: i32,
    pub process_in: Duration,
}

/// Signup default: ordinary queue, small retry budget, and a short
/// initial delay so the worker does not claim the task before the
/// signup transaction has committed the user row.
impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            queue: TaskQueue::Default,
            max_retries: 3,
            process_in: Duration::from_secs(10),
        }
    }
}

impl TaskOptions {
    /// Options for explicit resend requests: critical queue, elevated
    /// retry budget.
    pub fn critical() -> Self {
        Self {
            queue: TaskQueue::Critical,
            max_retries: 10,
            process_in: Duration::from_secs(10),
        }
    }
}

/// Interface for handing tasks to the asynchronous worker.
///
/// The user-creation operation only requires that distribution reports
/// success or failure; a failure rolls the user insert back.
#[async_trait]
pub trait TaskDistributor: Send + Sync {
    async fn distribute_send_verify_email(
        &self,
        payload: SendVerifyEmailPayload,
        opts: TaskOptions,
    ) -> Result<(), AppError>;
}

/// Postgres-backed distributor: enqueueing is one row insert.
pub struct PgTaskDistributor {
    pool: DbPool,
}

impl PgTaskDistributor {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskDistributor for PgTaskDistributor {
    async fn distribute_send_verify_email(
        &self,
        payload: SendVerifyEmailPayload,
        opts: TaskOptions,
    ) -> Result<(), AppError> {
        let task = tasks::insert_task(
            &self.pool,
            &payload.username,
            opts.queue,
            opts.max_retries,
            Utc::now() + opts.process_in,
        )
        .await?;

        tracing::info!(
            task_id = task.id,
            username = %payload.username,
            queue = ?opts.queue,
            "enqueued verification email task"
        );

        Ok(())
    }
}
