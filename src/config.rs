//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment
//! variables into a type-safe struct, then validates the values that
//! cannot be checked by deserialization alone (secret length, gateway URL).

use std::time::Duration;

use serde::Deserialize;

/// Minimum length of the token signing secret, in bytes.
pub const MIN_TOKEN_SECRET_SIZE: usize = 32;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `TOKEN_SECRET` (required): token signing key, at least 32 bytes
/// - `ACCESS_TOKEN_DURATION_SECS` (optional): defaults to 900 (15 minutes)
/// - `REFRESH_TOKEN_DURATION_SECS` (optional): defaults to 86400 (24 hours)
/// - `TRANSFER_MAX_ATTEMPTS` (optional): retry budget for transfers, defaults to 3
/// - `TRANSFER_ATTEMPT_TIMEOUT_SECS` (optional): per-attempt deadline, defaults to 10
/// - `WORKER_POLL_INTERVAL_SECS` (optional): email worker poll interval, defaults to 5
/// - `MAIL_GATEWAY_URL` (optional): HTTP mail gateway; when absent, mail is logged
/// - `MAIL_GATEWAY_SECRET` (required when the gateway URL is set): payload signing key
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub token_secret: String,

    #[serde(default = "default_access_token_duration")]
    pub access_token_duration_secs: u64,

    #[serde(default = "default_refresh_token_duration")]
    pub refresh_token_duration_secs: u64,

    #[serde(default = "default_transfer_max_attempts")]
    pub transfer_max_attempts: u32,

    #[serde(default = "default_transfer_attempt_timeout")]
    pub transfer_attempt_timeout_secs: u64,

    #[serde(default = "default_worker_poll_interval")]
    pub worker_poll_interval_secs: u64,

    #[serde(default)]
    pub mail_gateway_url: Option<String>,

    #[serde(default)]
    pub mail_gateway_secret: Option<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_access_token_duration() -> u64 {
    900
}

fn default_refresh_token_duration() -> u64 {
    86_400
}

fn default_transfer_max_attempts() -> u32 {
    3
}

fn default_transfer_attempt_timeout() -> u64 {
    10
}

fn default_worker_poll_interval() -> u64 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// First attempts to load a `.env` file (which is optional), then
    /// reads environment variables and deserializes them into a Config.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
    }

    /// Validate the values deserialization cannot check.
    ///
    /// # Rules
    ///
    /// - The token secret must be at least [`MIN_TOKEN_SECRET_SIZE`] bytes.
    /// - If a mail gateway URL is set it must parse as HTTP(S), and a
    ///   gateway secret must be set alongside it.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.token_secret.len() < MIN_TOKEN_SECRET_SIZE {
            anyhow::bail!(
                "TOKEN_SECRET must be at least {} bytes, got {}",
                MIN_TOKEN_SECRET_SIZE,
                self.token_secret.len()
            );
        }

        if let Some(ref gateway_url) = self.mail_gateway_url {
            let parsed = url::Url::parse(gateway_url)
                .map_err(|e| anyhow::anyhow!("MAIL_GATEWAY_URL is not a valid URL: {e}"))?;

            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("MAIL_GATEWAY_URL must use HTTP or HTTPS");
            }

            if self.mail_gateway_secret.is_none() {
                anyhow::bail!("MAIL_GATEWAY_SECRET is required when MAIL_GATEWAY_URL is set");
            }
        }

        Ok(())
    }

    pub fn access_token_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_duration_secs as i64)
    }

    pub fn refresh_token_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_duration_secs as i64)
    }

    pub fn transfer_attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_attempt_timeout_secs)
    }

    pub fn worker_poll_interval(&self) -> Duration {
        Duration::from_secs(self.worker_poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/bankd".to_string(),
            server_port: 3000,
            token_secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_token_duration_secs: 900,
            refresh_token_duration_secs: 86_400,
            transfer_max_attempts: 3,
            transfer_attempt_timeout_secs: 10,
            worker_poll_interval_secs: 5,
            mail_gateway_url: None,
            mail_gateway_secret: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn short_token_secret_is_rejected() {
        let mut config = base_config();
        config.token_secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn gateway_url_requires_secret() {
        let mut config = base_config();
        config.mail_gateway_url = Some("https://mail.example.com/send".to_string());
        assert!(config.validate().is_err());

        config.mail_gateway_secret = Some("gateway-secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_gateway_url_is_rejected() {
        let mut config = base_config();
        config.mail_gateway_url = Some("not a url".to_string());
        config.mail_gateway_secret = Some("gateway-secret".to_string());
        assert!(config.validate().is_err());

        config.mail_gateway_url = Some("ftp://mail.example.com".to_string());
        assert!(config.validate().is_err());
    }
}
