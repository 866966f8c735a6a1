use sea_orm::{DatabaseConnection, DbErr};
use std::env;
use std::sync::Arc;
use tracing::warn;

use crate::db::services::settings_service;
use crate::notifications::models::ChannelConfig;
use crate::services::crypto_service::SettingSealer;

/// Keys under which the bot credentials and notification target live, both as
/// environment variables and as rows in the settings table.
pub mod keys {
    pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const TELEGRAM_BOT_SECRET: &str = "TELEGRAM_BOT_SECRET";
    pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
    pub const NOTIFY_EMAIL: &str = "NOTIFY_EMAIL";
}

const ALERT_MAIL_SUBJECT: &str = "Low Stock Alert";

/// Layered credential lookup: a set environment variable always wins, the
/// settings table is the persisted fallback. Secret-bearing keys are sealed in
/// the table and opened on the way out.
#[derive(Clone)]
pub struct CredentialResolver {
    db: DatabaseConnection,
    sealer: Arc<SettingSealer>,
}

impl CredentialResolver {
    pub fn new(db: DatabaseConnection, sealer: Arc<SettingSealer>) -> Self {
        Self { db, sealer }
    }

    fn env_override(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }

    async fn resolve_plain(&self, key: &str) -> Result<Option<String>, DbErr> {
        if let Some(value) = Self::env_override(key) {
            return Ok(Some(value));
        }
        settings_service::get_setting_string(&self.db, key).await
    }

    async fn resolve_sealed(&self, key: &str) -> Result<Option<String>, DbErr> {
        if let Some(value) = Self::env_override(key) {
            return Ok(Some(value));
        }
        let Some(sealed) = settings_service::get_setting_string(&self.db, key).await? else {
            return Ok(None);
        };
        match self.sealer.open(&sealed) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Failed to open sealed setting; ignoring stored value.");
                Ok(None)
            }
        }
    }

    pub async fn bot_token(&self) -> Result<Option<String>, DbErr> {
        self.resolve_sealed(keys::TELEGRAM_BOT_TOKEN).await
    }

    pub async fn bot_secret(&self) -> Result<Option<String>, DbErr> {
        self.resolve_sealed(keys::TELEGRAM_BOT_SECRET).await
    }

    pub async fn chat_id(&self) -> Result<Option<String>, DbErr> {
        self.resolve_plain(keys::TELEGRAM_CHAT_ID).await
    }

    pub async fn notify_email(&self) -> Result<Option<String>, DbErr> {
        self.resolve_plain(keys::NOTIFY_EMAIL).await
    }

    /// Telegram delivery config, or `None` while token or chat id is missing.
    pub async fn telegram_config(&self) -> Result<Option<ChannelConfig>, DbErr> {
        let (Some(bot_token), Some(chat_id)) = (self.bot_token().await?, self.chat_id().await?)
        else {
            return Ok(None);
        };
        Ok(Some(ChannelConfig::Telegram { bot_token, chat_id }))
    }

    /// Email delivery config, or `None` while no notify address is registered.
    pub async fn email_config(&self) -> Result<Option<ChannelConfig>, DbErr> {
        let Some(to_address) = self.notify_email().await? else {
            return Ok(None);
        };
        Ok(Some(ChannelConfig::Email {
            to_address,
            subject: ALERT_MAIL_SUBJECT.to_string(),
        }))
    }

    /// Persists a plaintext setting (chat id, notify address).
    pub async fn store_plain(&self, key: &str, value: &str) -> Result<(), DbErr> {
        settings_service::update_setting_string(&self.db, key, value).await?;
        Ok(())
    }

    /// Seals and persists a secret setting (bot token, shared secret).
    pub async fn store_sealed(&self, key: &str, value: &str) -> Result<(), DbErr> {
        let sealed = self
            .sealer
            .seal(value)
            .map_err(|e| DbErr::Custom(format!("Failed to seal setting {key}: {e}")))?;
        settings_service::update_setting_string(&self.db, key, &sealed).await?;
        Ok(())
    }

    /// Whether a value exists for the key, without opening it. Used by the
    /// settings API to report presence without echoing secrets.
    pub async fn is_configured(&self, key: &str) -> Result<bool, DbErr> {
        if Self::env_override(key).is_some() {
            return Ok(true);
        }
        Ok(settings_service::get_setting_string(&self.db, key)
            .await?
            .is_some())
    }
}
