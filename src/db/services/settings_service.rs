use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};

use crate::db::entities::setting;

/// Retrieves a setting by its key.
pub async fn get_setting(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<setting::Model>, DbErr> {
    setting::Entity::find_by_id(key.to_owned()).one(db).await
}

/// Retrieves a setting whose value is a JSON string, unwrapped.
pub async fn get_setting_string(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<String>, DbErr> {
    Ok(get_setting(db, key)
        .await?
        .and_then(|model| model.value.as_str().map(|s| s.to_owned())))
}

/// Creates or updates a setting (INSERT ON CONFLICT DO UPDATE on the key).
pub async fn update_setting(
    db: &DatabaseConnection,
    key: &str,
    value: &serde_json::Value,
) -> Result<(), DbErr> {
    let active_setting = setting::ActiveModel {
        key: Set(key.to_owned()),
        value: Set(value.clone()),
        updated_at: Set(Utc::now()),
    };
    setting::Entity::insert(active_setting)
        .on_conflict(
            OnConflict::column(setting::Column::Key)
                .update_columns([setting::Column::Value, setting::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Creates or updates a setting holding a plain string value.
pub async fn update_setting_string(
    db: &DatabaseConnection,
    key: &str,
    value: &str,
) -> Result<(), DbErr> {
    update_setting(db, key, &serde_json::Value::String(value.to_owned())).await
}
