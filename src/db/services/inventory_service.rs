use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::db::entities::inventory_item;
use crate::db::enums::ItemCategory;

/// Field set shared by the create and update paths.
#[derive(Debug, Clone)]
pub struct InventoryItemInput {
    pub name: String,
    pub category: ItemCategory,
    pub quantity: i32,
    pub min_quantity: i32,
    pub unit: String,
    pub price: f64,
    pub supplier: Option<String>,
    pub description: Option<String>,
}

/// Lists items ordered by category then name (the ordering the fingerprint and
/// the alert report both rely on), optionally restricted to one category.
pub async fn list_items(
    db: &DatabaseConnection,
    category: Option<ItemCategory>,
) -> Result<Vec<inventory_item::Model>, DbErr> {
    let mut query = inventory_item::Entity::find()
        .order_by_asc(inventory_item::Column::Category)
        .order_by_asc(inventory_item::Column::Name);
    if let Some(category) = category {
        query = query.filter(inventory_item::Column::Category.eq(category));
    }
    query.all(db).await
}

pub async fn get_item(
    db: &DatabaseConnection,
    item_id: i32,
) -> Result<Option<inventory_item::Model>, DbErr> {
    inventory_item::Entity::find_by_id(item_id).one(db).await
}

pub async fn create_item(
    db: &DatabaseConnection,
    input: InventoryItemInput,
    updated_by_id: i32,
) -> Result<inventory_item::Model, DbErr> {
    let now = Utc::now();
    inventory_item::ActiveModel {
        name: Set(input.name),
        category: Set(input.category),
        quantity: Set(input.quantity),
        min_quantity: Set(input.min_quantity),
        unit: Set(input.unit),
        price: Set(input.price),
        supplier: Set(input.supplier),
        description: Set(input.description),
        last_updated: Set(now),
        updated_by_id: Set(Some(updated_by_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update_item(
    db: &DatabaseConnection,
    item_id: i32,
    input: InventoryItemInput,
    updated_by_id: i32,
) -> Result<inventory_item::Model, DbErr> {
    let item = get_item(db, item_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("inventory item {item_id} not found")))?;

    let now = Utc::now();
    let mut active = item.into_active_model();
    active.name = Set(input.name);
    active.category = Set(input.category);
    active.quantity = Set(input.quantity);
    active.min_quantity = Set(input.min_quantity);
    active.unit = Set(input.unit);
    active.price = Set(input.price);
    active.supplier = Set(input.supplier);
    active.description = Set(input.description);
    active.last_updated = Set(now);
    active.updated_by_id = Set(Some(updated_by_id));
    active.updated_at = Set(now);
    active.update(db).await
}

pub async fn delete_item(db: &DatabaseConnection, item_id: i32) -> Result<DeleteResult, DbErr> {
    inventory_item::Entity::delete_by_id(item_id).exec(db).await
}

/// Additive restock: the quantity grows by `amount` on every invocation.
/// Returns `None` when the item does not exist. `updated_by_id` is absent for
/// bot-driven restocks, which carry no application user.
pub async fn restock_item(
    db: &DatabaseConnection,
    item_id: i32,
    amount: i32,
    updated_by_id: Option<i32>,
) -> Result<Option<inventory_item::Model>, DbErr> {
    let Some(item) = get_item(db, item_id).await? else {
        return Ok(None);
    };

    let now = Utc::now();
    let new_quantity = item.quantity + amount;
    let mut active = item.into_active_model();
    active.quantity = Set(new_quantity);
    active.last_updated = Set(now);
    active.updated_at = Set(now);
    if updated_by_id.is_some() {
        active.updated_by_id = Set(updated_by_id);
    }
    active.update(db).await.map(Some)
}
