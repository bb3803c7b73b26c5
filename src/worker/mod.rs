//! Asynchronous verification-email pipeline.
//!
//! The queue is the database: the distributor inserts task rows, and
//! the processor claims them with `FOR UPDATE SKIP LOCKED`, so multiple
//! server instances can share one queue without double-delivery.

pub mod distributor;
pub mod mailer;
pub mod processor;
pub mod tasks;

pub use distributor::{PgTaskDistributor, SendVerifyEmailPayload, TaskDistributor, TaskOptions};
pub use mailer::{EmailSender, HttpMailer, LogMailer, MailMessage};
pub use processor::TaskProcessor;
