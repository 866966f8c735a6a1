use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use crate::db::entities::calendar_event;

pub async fn list_events(db: &DatabaseConnection) -> Result<Vec<calendar_event::Model>, DbErr> {
    calendar_event::Entity::find()
        .order_by_asc(calendar_event::Column::StartsAt)
        .all(db)
        .await
}

pub async fn create_event(
    db: &DatabaseConnection,
    organizer_id: i32,
    title: String,
    description: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<calendar_event::Model, DbErr> {
    let now = Utc::now();
    calendar_event::ActiveModel {
        title: Set(title),
        description: Set(description),
        starts_at: Set(starts_at),
        ends_at: Set(ends_at),
        organizer_id: Set(organizer_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
