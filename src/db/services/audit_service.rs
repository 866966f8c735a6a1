use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};

use crate::db::entities::audit_log;

/// Appends an audit entry. Failures are the caller's to decide on; mutation
/// handlers log and continue rather than failing the user action.
pub async fn record_action(
    db: &DatabaseConnection,
    user_id: i32,
    action: &str,
    details: Option<serde_json::Value>,
) -> Result<audit_log::Model, DbErr> {
    audit_log::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.to_owned()),
        details: Set(details),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn list_recent_actions(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<audit_log::Model>, DbErr> {
    audit_log::Entity::find()
        .order_by_desc(audit_log::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}
