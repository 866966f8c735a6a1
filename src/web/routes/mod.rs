use tracing::warn;

use crate::db::services as db_services;
use crate::web::AppState;

pub mod admin_routes;
pub mod document_routes;
pub mod event_routes;
pub mod inventory_routes;
pub mod settings_routes;
pub mod ticket_routes;

/// Records an audit entry without ever failing the request that triggered it.
pub(crate) async fn audit(
    app_state: &AppState,
    user_id: i32,
    action: &str,
    details: serde_json::Value,
) {
    if let Err(e) =
        db_services::record_action(&app_state.db_pool, user_id, action, Some(details)).await
    {
        warn!(error = %e, action, "Failed to record audit entry");
    }
}
