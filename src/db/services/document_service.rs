use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, DeleteResult, EntityTrait, QueryOrder, Set,
};

use crate::db::entities::document;

pub async fn list_documents(db: &DatabaseConnection) -> Result<Vec<document::Model>, DbErr> {
    document::Entity::find()
        .order_by_desc(document::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn create_document(
    db: &DatabaseConnection,
    owner_id: i32,
    title: String,
    storage_path: String,
    category: String,
    doc_type: Option<String>,
    department: Option<String>,
) -> Result<document::Model, DbErr> {
    let now = Utc::now();
    document::ActiveModel {
        title: Set(title),
        storage_path: Set(storage_path),
        category: Set(category),
        doc_type: Set(doc_type),
        department: Set(department),
        owner_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn delete_document(
    db: &DatabaseConnection,
    document_id: i32,
) -> Result<DeleteResult, DbErr> {
    document::Entity::delete_by_id(document_id).exec(db).await
}
