use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::ticket;
use crate::db::enums::TicketStatus;

pub async fn list_tickets(db: &DatabaseConnection) -> Result<Vec<ticket::Model>, DbErr> {
    ticket::Entity::find()
        .order_by_desc(ticket::Column::CreatedAt)
        .all(db)
        .await
}

/// Tickets created by one user, newest first.
pub async fn list_tickets_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<ticket::Model>, DbErr> {
    ticket::Entity::find()
        .filter(ticket::Column::CreatorId.eq(user_id))
        .order_by_desc(ticket::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn create_ticket(
    db: &DatabaseConnection,
    creator_id: i32,
    title: String,
    description: Option<String>,
) -> Result<ticket::Model, DbErr> {
    let now = Utc::now();
    ticket::ActiveModel {
        title: Set(title),
        description: Set(description),
        status: Set(TicketStatus::Open),
        creator_id: Set(creator_id),
        assignee_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update_ticket_status(
    db: &DatabaseConnection,
    ticket_id: i32,
    status: TicketStatus,
) -> Result<ticket::Model, DbErr> {
    let ticket = ticket::Entity::find_by_id(ticket_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("ticket {ticket_id} not found")))?;

    let mut active = ticket.into_active_model();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

pub async fn assign_ticket(
    db: &DatabaseConnection,
    ticket_id: i32,
    assignee_id: Option<i32>,
) -> Result<ticket::Model, DbErr> {
    let ticket = ticket::Entity::find_by_id(ticket_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("ticket {ticket_id} not found")))?;

    let mut active = ticket.into_active_model();
    active.assignee_id = Set(assignee_id);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}
