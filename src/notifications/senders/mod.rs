use async_trait::async_trait;
use thiserror::Error;

use super::models::ChannelConfig;

pub mod email;
pub mod telegram;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
    #[error("Invalid configuration for sender: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("SMTP error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),
}

/// A trait for sending notifications to a specific channel type.
/// All concrete sender implementations (Telegram, email) must implement this.
#[async_trait]
pub trait NotificationSender {
    /// Sends `message` using the given, already-resolved channel configuration.
    async fn send(&self, config: &ChannelConfig, message: &str) -> Result<(), SenderError>;
}
