use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::entities::user;
use crate::db::enums::UserRole;

pub async fn count_users(db: &DatabaseConnection) -> Result<u64, DbErr> {
    user::Entity::find().count(db).await
}

pub async fn find_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn find_user_by_id(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(user_id).one(db).await
}

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
}

pub async fn create_user(
    db: &DatabaseConnection,
    name: String,
    email: String,
    password_hash: String,
    role: UserRole,
) -> Result<user::Model, DbErr> {
    let now = Utc::now();
    user::ActiveModel {
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Updates profile fields; the password is only touched when a new hash is given.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i32,
    name: String,
    email: String,
    role: UserRole,
    password_hash: Option<String>,
) -> Result<user::Model, DbErr> {
    let user = find_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("user {user_id} not found")))?;

    let mut active = user.into_active_model();
    active.name = Set(name);
    active.email = Set(email);
    active.role = Set(role);
    if let Some(hash) = password_hash {
        active.password_hash = Set(hash);
    }
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

pub async fn delete_user(db: &DatabaseConnection, user_id: i32) -> Result<DeleteResult, DbErr> {
    user::Entity::delete_by_id(user_id).exec(db).await
}
