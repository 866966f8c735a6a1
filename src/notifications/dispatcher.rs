use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{debug, error};

use crate::alerting::threshold;
use crate::db::entities::inventory_item;
use crate::db::enums::ItemCategory;
use crate::notifications::credentials::CredentialResolver;
use crate::notifications::senders::{email::EmailSender, telegram::TelegramSender, NotificationSender};

/// Identical message text is sent at most once per this window, regardless of
/// which call site (mutation path or monitor) produced it.
pub const DUPLICATE_SEND_WINDOW: Duration = Duration::from_secs(30);

pub const ALL_CLEAR_MESSAGE: &str = "✅ *All inventory items have been restocked*";
pub const HEALTHY_LEVELS_MESSAGE: &str = "✅ All inventory levels are healthy.";

/// Guard at the outbound send primitive: suppresses a re-send of the exact same
/// text within the window. A suppressed send does not refresh the timestamp.
pub struct DuplicateWindow {
    window: Duration,
    last_sent: Mutex<Option<(String, Instant)>>,
}

impl DuplicateWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_sent: Mutex::new(None),
        }
    }

    /// True when the text may go out; records it as the latest send.
    pub async fn permit(&self, text: &str) -> bool {
        let now = Instant::now();
        let mut last_sent = self.last_sent.lock().await;
        if let Some((last_text, sent_at)) = last_sent.as_ref() {
            if last_text == text && now.duration_since(*sent_at) < self.window {
                return false;
            }
        }
        *last_sent = Some((text.to_owned(), now));
        true
    }
}

/// Formats and sends alerts through every configured channel, best effort.
/// Transport failures are logged at this boundary and never reach the monitor
/// or the request handler that triggered the alert.
pub struct AlertDispatcher {
    credentials: CredentialResolver,
    telegram: TelegramSender,
    email: EmailSender,
    window: DuplicateWindow,
}

impl AlertDispatcher {
    pub fn new(credentials: CredentialResolver) -> Self {
        Self {
            credentials,
            telegram: TelegramSender::new(),
            email: EmailSender::from_env(),
            window: DuplicateWindow::new(DUPLICATE_SEND_WINDOW),
        }
    }

    pub async fn dispatch(&self, message: &str) {
        if !self.window.permit(message).await {
            debug!("Skipping duplicate alert within the send window");
            return;
        }

        match self.credentials.telegram_config().await {
            Ok(Some(config)) => {
                if let Err(e) = self.telegram.send(&config, message).await {
                    error!(error = %e, "Telegram send error");
                }
            }
            Ok(None) => debug!("Telegram alert not sent: missing bot token or chat id"),
            Err(e) => error!(error = %e, "Failed to resolve Telegram credentials"),
        }

        match self.credentials.email_config().await {
            Ok(Some(config)) => {
                if let Err(e) = self.email.send(&config, message).await {
                    error!(error = %e, "Email send error");
                }
            }
            Ok(None) => debug!("Email alert not sent: no notify address registered"),
            Err(e) => error!(error = %e, "Failed to resolve notify address"),
        }
    }
}

fn category_items<'a>(
    low_items: &'a [inventory_item::Model],
    category: ItemCategory,
) -> impl Iterator<Item = &'a inventory_item::Model> {
    low_items.iter().filter(move |item| item.category == category)
}

/// Alert body pushed by the monitor when the low-stock picture changes.
/// Items are grouped by category with per-item quantity, threshold and
/// percent-remaining, plus a fixed call to action.
pub fn format_low_stock_alert(low_items: &[inventory_item::Model]) -> String {
    let mut message = String::from("🚨 *INVENTORY LOW STOCK ALERT* 🚨\n\n");

    let consumables: Vec<_> = category_items(low_items, ItemCategory::Consumable).collect();
    let materials: Vec<_> = category_items(low_items, ItemCategory::Material).collect();

    if !consumables.is_empty() {
        message.push_str("📦 *CONSUMABLES*:\n");
        for item in &consumables {
            message.push_str(&format!(
                "• *{}*: {} of {} {} ({}%)\n",
                item.name,
                item.quantity,
                threshold::effective_min_quantity(item),
                item.unit,
                threshold::percent_remaining(item)
            ));
        }
        message.push('\n');
    }

    if !materials.is_empty() {
        message.push_str("🔧 *MATERIALS*:\n");
        for item in &materials {
            message.push_str(&format!(
                "• *{}*: {} of {} {} ({}%)\n",
                item.name,
                item.quantity,
                threshold::effective_min_quantity(item),
                item.unit,
                threshold::percent_remaining(item)
            ));
        }
    }

    message.push_str("\n📋 _Please restock these items as soon as possible_");
    message
}

/// On-demand report for the bot's `/low` command: same grouping, but with item
/// ids and a restock usage hint so the operator can act from the chat.
pub fn format_low_stock_report(low_items: &[inventory_item::Model]) -> String {
    let mut message = String::from("🚨 *LOW STOCK INVENTORY REPORT* 🚨\n\n");

    let consumables: Vec<_> = category_items(low_items, ItemCategory::Consumable).collect();
    let materials: Vec<_> = category_items(low_items, ItemCategory::Material).collect();

    if !consumables.is_empty() {
        message.push_str("📦 *CONSUMABLES*:\n");
        for item in &consumables {
            message.push_str(&format!(
                "• *{}* (#{}): {}/{} {} ({}%)\n",
                item.name,
                item.id,
                item.quantity,
                threshold::effective_min_quantity(item),
                item.unit,
                threshold::percent_remaining(item)
            ));
        }
        message.push('\n');
    }

    if !materials.is_empty() {
        message.push_str("🔧 *MATERIALS*:\n");
        for item in &materials {
            message.push_str(&format!(
                "• *{}* (#{}): {}/{} {} ({}%)\n",
                item.name,
                item.id,
                item.quantity,
                threshold::effective_min_quantity(item),
                item.unit,
                threshold::percent_remaining(item)
            ));
        }
    }

    message.push_str("\nUse `/restock {secret} {item_id} {amount}` to restock an item.");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(
        id: i32,
        name: &str,
        category: ItemCategory,
        quantity: i32,
        min_quantity: i32,
    ) -> inventory_item::Model {
        let now = Utc::now();
        inventory_item::Model {
            id,
            name: name.to_string(),
            category,
            quantity,
            min_quantity,
            unit: "pcs".to_string(),
            price: 1.0,
            supplier: None,
            description: None,
            last_updated: now,
            updated_by_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_window_suppresses_within_window() {
        let window = DuplicateWindow::new(DUPLICATE_SEND_WINDOW);

        assert!(window.permit("low stock: bolts").await);
        assert!(!window.permit("low stock: bolts").await);

        // A different text is never suppressed.
        assert!(window.permit("low stock: screws").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_window_reopens_after_window() {
        let window = DuplicateWindow::new(DUPLICATE_SEND_WINDOW);

        assert!(window.permit("low stock: bolts").await);
        assert!(!window.permit("low stock: bolts").await);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(window.permit("low stock: bolts").await);
    }

    #[test]
    fn test_alert_groups_by_category_with_percentages() {
        let low = vec![
            item(1, "Bolts", ItemCategory::Consumable, 5, 10),
            item(2, "Steel Rod", ItemCategory::Material, 1, 4),
        ];

        let message = format_low_stock_alert(&low);

        assert!(message.contains("🚨 *INVENTORY LOW STOCK ALERT* 🚨"));
        assert!(message.contains("📦 *CONSUMABLES*:"));
        assert!(message.contains("• *Bolts*: 5 of 10 pcs (50%)"));
        assert!(message.contains("🔧 *MATERIALS*:"));
        assert!(message.contains("• *Steel Rod*: 1 of 4 pcs (25%)"));
        assert!(message.contains("Please restock these items as soon as possible"));
    }

    #[test]
    fn test_alert_omits_empty_category_sections() {
        let low = vec![item(1, "Bolts", ItemCategory::Consumable, 5, 10)];

        let message = format_low_stock_alert(&low);

        assert!(message.contains("📦 *CONSUMABLES*:"));
        assert!(!message.contains("🔧 *MATERIALS*:"));
    }

    #[test]
    fn test_report_includes_item_ids_and_usage_hint() {
        let low = vec![item(7, "Grease", ItemCategory::Consumable, 2, 8)];

        let message = format_low_stock_report(&low);

        assert!(message.contains("• *Grease* (#7): 2/8 pcs (25%)"));
        assert!(message.contains("Use `/restock {secret} {item_id} {amount}`"));
    }
}
