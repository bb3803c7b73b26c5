//! Mail delivery.
//!
//! `EmailSender` is the seam the processor delivers through. Two
//! implementations exist: `HttpMailer` posts a signed payload to an
//! HTTP mail gateway; `LogMailer` writes the mail to the log for
//! deployments without a gateway.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// One outbound mail.
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Interface for delivering mail.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), AppError>;
}

/// Delivers mail by POSTing a signed JSON payload to an HTTP gateway.
///
/// # Headers Sent
///
/// - `Content-Type: application/json`
/// - `X-Gateway-Signature: sha256=<hex HMAC of the body>`
///
/// Delivery problems are reported as `Transient`, so the task worker
/// retries them on its backoff schedule.
pub struct HttpMailer {
    client: reqwest::Client,
    gateway_url: String,
    secret: String,
}

impl HttpMailer {
    /// 5 seconds per delivery; slow gateways must not stall the worker.
    pub fn new(gateway_url: String, secret: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            gateway_url,
            secret,
        })
    }
}

#[async_trait]
impl EmailSender for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AppError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| AppError::Invalid(format!("failed to serialize mail payload: {e}")))?;

        let signature = generate_signature(&self.secret, &payload);

        let response = self
            .client
            .post(&self.gateway_url)
            .header("Content-Type", "application/json")
            .header("X-Gateway-Signature", &signature)
            .body(payload)
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("mail gateway unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Transient(format!(
                "mail gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Generate the `sha256=<hex>` HMAC signature for a payload.
fn generate_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(payload.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Log-only delivery for deployments without a mail gateway.
pub struct LogMailer;

#[async_trait]
impl EmailSender for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AppError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "log-only mail delivery"
        );
        tracing::debug!(body = %message.body, "mail body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_and_keyed() {
        let sig1 = generate_signature("secret", r#"{"to":"a@example.com"}"#);
        let sig2 = generate_signature("secret", r#"{"to":"a@example.com"}"#);
        let sig3 = generate_signature("other", r#"{"to":"a@example.com"}"#);

        assert!(sig1.starts_with("sha256="));
        assert_eq!(sig1, sig2);
        assert_ne!(sig1, sig3);
    }
}
