use once_cell::sync::Lazy;
use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::alerting::monitor::StockCheckRequest;
use crate::alerting::threshold;
use crate::bot::commands::Command;
use crate::db::services as db_services;
use crate::notifications::credentials::{keys, CredentialResolver};
use crate::notifications::dispatcher;

pub mod commands;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_BACKOFF: Duration = Duration::from_secs(5);

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[allow(dead_code)]
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    chat: Chat,
    text: Option<String>,
    from: Option<MessageSender>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct MessageSender {
    username: Option<String>,
    first_name: Option<String>,
}

#[derive(Serialize)]
struct ReplyMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

/// Resolves credentials and runs the long-poll loop for the lifetime of the
/// process. Missing token or secret disables the bot with a log line; that is
/// a configuration state, not an error.
pub async fn start_bot(
    db: DatabaseConnection,
    credentials: CredentialResolver,
    check_tx: mpsc::Sender<StockCheckRequest>,
) {
    let token = match credentials.bot_token().await {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to load bot token");
            None
        }
    };
    let secret = match credentials.bot_secret().await {
        Ok(secret) => secret,
        Err(e) => {
            error!(error = %e, "Failed to load bot secret");
            None
        }
    };

    let (Some(token), Some(secret)) = (token, secret) else {
        info!("Telegram bot disabled: missing token or secret");
        return;
    };

    let bot = TelegramBot {
        token,
        secret,
        db,
        credentials,
        check_tx,
    };
    info!("Telegram bot started");
    bot.poll_updates().await;
}

struct TelegramBot {
    token: String,
    secret: String,
    db: DatabaseConnection,
    credentials: CredentialResolver,
    check_tx: mpsc::Sender<StockCheckRequest>,
}

impl TelegramBot {
    async fn poll_updates(&self) {
        let mut offset: i64 = 0;
        loop {
            match self.fetch_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        if let Some(message) = update.message {
                            self.handle_message(message).await;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to fetch bot updates; backing off");
                    sleep(POLL_BACKOFF).await;
                }
            }
        }
    }

    async fn fetch_updates(&self, offset: i64) -> Result<Vec<Update>, reqwest::Error> {
        let url = format!("{TELEGRAM_API_BASE}/bot{}/getUpdates", self.token);
        let response = HTTP_CLIENT
            .get(&url)
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
            ])
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .send()
            .await?
            .error_for_status()?;

        let body: UpdatesResponse = response.json().await?;
        Ok(body.result)
    }

    async fn handle_message(&self, message: IncomingMessage) {
        let Some(text) = message.text else {
            return;
        };
        let Some(command) = commands::parse(&text) else {
            return;
        };
        let chat_id = message.chat.id;

        // Uniform gate: a wrong secret gets the same reply on every command and
        // leaves all state untouched.
        if command.secret() != self.secret {
            self.reply(chat_id, "Unauthorized").await;
            return;
        }

        match command {
            Command::LowStockReport { .. } => self.handle_low_report(chat_id).await,
            Command::Restock {
                item_id, amount, ..
            } => self.handle_restock(chat_id, item_id, amount).await,
            Command::RegisterChat { .. } => {
                self.handle_register(
                    chat_id,
                    message.from,
                    "Chat ID registered for low stock notifications.",
                    StockCheckRequest::Check,
                )
                .await
            }
            Command::EnableNotifications { .. } => {
                self.handle_register(
                    chat_id,
                    message.from,
                    "✅ Your chat is now registered for automatic inventory notifications!",
                    StockCheckRequest::ResetAndCheck,
                )
                .await
            }
        }
    }

    async fn handle_low_report(&self, chat_id: i64) {
        match db_services::list_items(&self.db, None).await {
            Ok(items) => {
                let low_items: Vec<_> = items
                    .into_iter()
                    .filter(|item| threshold::is_low(item))
                    .collect();
                if low_items.is_empty() {
                    self.reply(chat_id, dispatcher::HEALTHY_LEVELS_MESSAGE).await;
                } else {
                    self.reply(chat_id, &dispatcher::format_low_stock_report(&low_items))
                        .await;
                }
            }
            Err(e) => {
                error!(error = %e, "Bot error while building low-stock report");
                self.reply(chat_id, "Error fetching inventory").await;
            }
        }
    }

    async fn handle_restock(&self, chat_id: i64, item_id: i32, amount: i32) {
        match db_services::restock_item(&self.db, item_id, amount, None).await {
            Ok(None) => {
                self.reply(chat_id, "Item not found").await;
            }
            Ok(Some(item)) => {
                // Force the next cycle to re-report even if the set of low
                // items did not change shape.
                self.request_check(StockCheckRequest::ResetAndCheck).await;
                self.reply(
                    chat_id,
                    &format!(
                        "✅ Restocked *{}*. New quantity: *{}* {}",
                        item.name, item.quantity, item.unit
                    ),
                )
                .await;
            }
            Err(e) => {
                error!(error = %e, item_id, "Bot error while restocking");
                self.reply(chat_id, "Error updating inventory").await;
            }
        }
    }

    async fn handle_register(
        &self,
        chat_id: i64,
        from: Option<MessageSender>,
        reply_text: &str,
        check: StockCheckRequest,
    ) {
        match self
            .credentials
            .store_plain(keys::TELEGRAM_CHAT_ID, &chat_id.to_string())
            .await
        {
            Ok(()) => {
                let registered_by = from
                    .and_then(|sender| sender.username.or(sender.first_name))
                    .unwrap_or_else(|| "unknown".to_string());
                info!(chat_id, registered_by = %registered_by, "Chat registered for notifications");
                self.reply(chat_id, reply_text).await;
                self.request_check(check).await;
            }
            Err(e) => {
                error!(error = %e, "Bot error while registering chat");
                self.reply(chat_id, "Error setting chat ID").await;
            }
        }
    }

    async fn request_check(&self, request: StockCheckRequest) {
        if let Err(e) = self.check_tx.send(request).await {
            error!(error = %e, "Failed to queue stock check request");
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        let url = format!("{TELEGRAM_API_BASE}/bot{}/sendMessage", self.token);
        let payload = ReplyMessage {
            chat_id,
            text,
            parse_mode: "Markdown",
        };
        match HTTP_CLIENT.post(&url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "Telegram reply rejected");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to send Telegram reply"),
        }
    }
}
