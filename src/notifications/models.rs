use serde::{Deserialize, Serialize};

/// Per-channel delivery configuration, resolved at send time so runtime changes
/// to the registered chat or notify address take effect on the next alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChannelConfig {
    Telegram {
        bot_token: String,
        chat_id: String,
    },
    Email {
        to_address: String,
        subject: String,
    },
}
