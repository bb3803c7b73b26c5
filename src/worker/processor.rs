//! Task processor - the background worker that materializes
//! verification records and delivers mail.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::{
    error::AppError,
    store::{Store, users, verify_emails, verify_emails::CreateVerifyEmailParams},
    util::random,
    worker::{
        mailer::{EmailSender, MailMessage},
        tasks,
        tasks::EmailTask,
    },
};

/// How long a verification code stays valid.
const CODE_TTL: Duration = Duration::from_secs(15 * 60);

/// Base delay before a failed task is retried; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(10);

/// Polls the task queue and processes due tasks.
pub struct TaskProcessor {
    store: Store,
    mailer: Arc<dyn EmailSender>,
    poll_interval: Duration,
}

impl TaskProcessor {
    pub fn new(store: Store, mailer: Arc<dyn EmailSender>, poll_interval: Duration) -> Self {
        Self {
            store,
            mailer,
            poll_interval,
        }
    }

    /// Run forever, draining due tasks on every tick.
    ///
    /// Intended to be spawned as its own tokio task at startup.
    pub async fn run(self) {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "email task processor started"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;

            loop {
                match self.process_next().await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(err) => {
                        tracing::error!(error = %err, "task queue poll failed");
                        break;
                    }
                }
            }
        }
    }

    /// Claim and process one task. Returns whether a task was claimed.
    async fn process_next(&self) -> Result<bool, AppError> {
        let Some(task) = tasks::claim_next_task(self.store.pool()).await? else {
            return Ok(false);
        };

        tracing::info!(
            task_id = task.id,
            username = %task.username,
            attempt = task.attempts,
            "processing verification email task"
        );

        if let Err(err) = self.handle_task(&task).await {
            self.handle_failure(&task, &err).await?;
        }

        Ok(true)
    }

    /// The processed unit of work, executed in one transaction:
    /// load the user, create the verification record, deliver the mail,
    /// mark the task completed. A delivery failure rolls the record
    /// back, so no code ever exists that was not mailed.
    async fn handle_task(&self, task: &EmailTask) -> Result<(), AppError> {
        let mailer = Arc::clone(&self.mailer);
        let username = task.username.clone();
        let task_id = task.id;

        self.store
            .with_transaction(move |tx| {
                Box::pin(async move {
                    let user = users::get_user(&mut **tx, &username).await?;

                    let record = verify_emails::create_verify_email(
                        &mut **tx,
                        &CreateVerifyEmailParams {
                            username: user.username.clone(),
                            email: user.email.clone(),
                            secret_code: random::random_secret_code(),
                            expired_at: Utc::now() + CODE_TTL,
                        },
                    )
                    .await?;

                    let message = MailMessage {
                        to: user.email.clone(),
                        subject: "Welcome to bankd - verify your email".to_string(),
                        body: format!(
                            "Hello {},\n\nverify your email address by submitting \
                             this code: {}\n\nThe code expires in 15 minutes.",
                            user.full_name, record.secret_code
                        ),
                    };
                    mailer.send(&message).await?;

                    tasks::complete_task(&mut **tx, task_id).await?;

                    Ok(())
                })
            })
            .await
    }

    /// Reschedule a failed task with exponential backoff, or record the
    /// final failure once the retry budget is spent.
    async fn handle_failure(&self, task: &EmailTask, err: &AppError) -> Result<(), AppError> {
        if task.attempts > task.max_retries {
            tracing::error!(
                task_id = task.id,
                username = %task.username,
                error = %err,
                "verification email task exhausted its retries"
            );
            tasks::record_task_failure(self.store.pool(), task.id, &err.to_string()).await?;
            return Ok(());
        }

        let delay = RETRY_BASE_DELAY * 2u32.saturating_pow(task.attempts.max(1) as u32 - 1);
        tracing::warn!(
            task_id = task.id,
            attempt = task.attempts,
            retry_in_secs = delay.as_secs(),
            error = %err,
            "verification email task failed, rescheduling"
        );

        tasks::reschedule_task(
            self.store.pool(),
            task.id,
            Utc::now() + delay,
            &err.to_string(),
        )
        .await
    }
}
