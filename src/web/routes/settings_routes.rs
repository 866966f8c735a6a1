use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::notifications::credentials::keys;
use crate::web::models::AuthenticatedUser;
use crate::web::routes::audit;
use crate::web::{AppError, AppState};

// --- Request/Response Structs ---

/// Secrets are reported as presence flags only; they are never echoed back.
#[derive(Serialize)]
pub struct BotSettingsResponse {
    bot_token_configured: bool,
    bot_secret_configured: bool,
    chat_id: Option<String>,
    notify_email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    bot_token: Option<String>,
    bot_secret: Option<String>,
    chat_id: Option<String>,
    notify_email: Option<String>,
}

// --- Route Handlers ---

async fn get_settings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<BotSettingsResponse>, AppError> {
    let credentials = &app_state.credentials;

    Ok(Json(BotSettingsResponse {
        bot_token_configured: credentials.is_configured(keys::TELEGRAM_BOT_TOKEN).await?,
        bot_secret_configured: credentials.is_configured(keys::TELEGRAM_BOT_SECRET).await?,
        chat_id: credentials.chat_id().await?,
        notify_email: credentials.notify_email().await?,
    }))
}

/// Upserts the supplied fields. The dispatcher resolves credentials per send,
/// so alert channels pick changes up immediately; the bot's polling loop reads
/// its token and secret at startup and needs a restart to follow.
async fn update_settings_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<StatusCode, AppError> {
    let credentials = &app_state.credentials;
    let mut updated_keys: Vec<&str> = Vec::new();

    if let Some(bot_token) = payload.bot_token.filter(|v| !v.is_empty()) {
        credentials
            .store_sealed(keys::TELEGRAM_BOT_TOKEN, &bot_token)
            .await?;
        updated_keys.push(keys::TELEGRAM_BOT_TOKEN);
    }
    if let Some(bot_secret) = payload.bot_secret.filter(|v| !v.is_empty()) {
        credentials
            .store_sealed(keys::TELEGRAM_BOT_SECRET, &bot_secret)
            .await?;
        updated_keys.push(keys::TELEGRAM_BOT_SECRET);
    }
    if let Some(chat_id) = payload.chat_id.filter(|v| !v.is_empty()) {
        credentials
            .store_plain(keys::TELEGRAM_CHAT_ID, &chat_id)
            .await?;
        updated_keys.push(keys::TELEGRAM_CHAT_ID);
    }
    if let Some(notify_email) = payload.notify_email.filter(|v| !v.is_empty()) {
        credentials
            .store_plain(keys::NOTIFY_EMAIL, &notify_email)
            .await?;
        updated_keys.push(keys::NOTIFY_EMAIL);
    }

    if updated_keys.is_empty() {
        return Err(AppError::InvalidInput(
            "No settings provided to update.".to_string(),
        ));
    }

    audit(
        &app_state,
        user.id,
        "settings_update",
        serde_json::json!({ "keys": updated_keys }),
    )
    .await;

    Ok(StatusCode::OK)
}

// --- Router ---

pub fn create_settings_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/settings",
        get(get_settings_handler).put(update_settings_handler),
    )
}
