use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::alerting::monitor::StockCheckRequest;
use crate::alerting::threshold;
use crate::db::entities::inventory_item;
use crate::db::enums::ItemCategory;
use crate::db::services::{self as db_services, InventoryItemInput};
use crate::web::middleware::auth;
use crate::web::models::AuthenticatedUser;
use crate::web::routes::audit;
use crate::web::{AppError, AppState};

// --- Request/Response Structs ---

#[derive(Deserialize)]
pub struct ListItemsQuery {
    category: Option<ItemCategory>,
}

#[derive(Deserialize)]
pub struct SaveItemRequest {
    name: String,
    category: ItemCategory,
    quantity: i32,
    min_quantity: Option<i32>,
    unit: String,
    price: f64,
    supplier: Option<String>,
    description: Option<String>,
}

impl SaveItemRequest {
    fn into_input(self) -> Result<InventoryItemInput, AppError> {
        if self.name.trim().is_empty() || self.unit.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Name and unit must not be empty.".to_string(),
            ));
        }
        if self.quantity < 0 {
            return Err(AppError::InvalidInput(
                "Quantity must not be negative.".to_string(),
            ));
        }
        let min_quantity = self.min_quantity.unwrap_or(0);
        if min_quantity < 0 {
            return Err(AppError::InvalidInput(
                "Minimum quantity must not be negative.".to_string(),
            ));
        }
        if self.price < 0.0 {
            return Err(AppError::InvalidInput(
                "Price must not be negative.".to_string(),
            ));
        }
        Ok(InventoryItemInput {
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            min_quantity,
            unit: self.unit,
            price: self.price,
            supplier: self.supplier,
            description: self.description,
        })
    }
}

#[derive(Deserialize)]
pub struct RestockRequest {
    additional_quantity: i32,
}

#[derive(Serialize)]
pub struct LowStockRow {
    id: i32,
    name: String,
    category: ItemCategory,
    quantity: i32,
    min_quantity: i32,
    unit: String,
    percent_remaining: i32,
}

impl From<&inventory_item::Model> for LowStockRow {
    fn from(item: &inventory_item::Model) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            category: item.category,
            quantity: item.quantity,
            min_quantity: threshold::effective_min_quantity(item),
            unit: item.unit.clone(),
            percent_remaining: threshold::percent_remaining(item),
        }
    }
}

/// Explicit post-write event: push an immediate alert when the touched item is
/// low and queue a monitor cycle. Never fails the request that triggered it.
async fn notify_inventory_change(app_state: &AppState, item: &inventory_item::Model) {
    if threshold::is_low(item) {
        let message = format!(
            "Inventory {} is below minimum quantity ({}/{})",
            item.name,
            item.quantity,
            threshold::effective_min_quantity(item)
        );
        app_state.dispatcher.dispatch(&message).await;
    }
    queue_stock_check(app_state);
}

fn queue_stock_check(app_state: &AppState) {
    if let Err(e) = app_state.stock_check_tx.try_send(StockCheckRequest::Check) {
        warn!(error = %e, "Failed to queue stock check after inventory write");
    }
}

// --- Route Handlers ---

async fn list_items_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<inventory_item::Model>>, AppError> {
    let items = db_services::list_items(&app_state.db_pool, query.category).await?;
    Ok(Json(items))
}

async fn low_stock_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<LowStockRow>>, AppError> {
    let items = db_services::list_items(&app_state.db_pool, None).await?;
    let rows = items
        .iter()
        .filter(|item| threshold::is_low(item))
        .map(LowStockRow::from)
        .collect();
    Ok(Json(rows))
}

async fn create_item_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SaveItemRequest>,
) -> Result<(StatusCode, Json<inventory_item::Model>), AppError> {
    let input = payload.into_input()?;
    let item = db_services::create_item(&app_state.db_pool, input, user.id).await?;

    notify_inventory_change(&app_state, &item).await;
    audit(
        &app_state,
        user.id,
        "inventory_add",
        serde_json::json!({ "itemId": item.id }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
    Json(payload): Json<SaveItemRequest>,
) -> Result<Json<inventory_item::Model>, AppError> {
    let input = payload.into_input()?;
    let item = db_services::update_item(&app_state.db_pool, item_id, input, user.id).await?;

    notify_inventory_change(&app_state, &item).await;
    audit(
        &app_state,
        user.id,
        "inventory_edit",
        serde_json::json!({ "itemId": item.id }),
    )
    .await;

    Ok(Json(item))
}

async fn delete_item_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let delete_result = db_services::delete_item(&app_state.db_pool, item_id).await?;
    if delete_result.rows_affected == 0 {
        return Err(AppError::NotFound("Inventory item not found".to_string()));
    }

    // The low set may have shrunk; let the monitor notice on its queue.
    queue_stock_check(&app_state);
    audit(
        &app_state,
        user.id,
        "inventory_delete",
        serde_json::json!({ "itemId": item_id }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

async fn restock_item_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
    Json(payload): Json<RestockRequest>,
) -> Result<Json<inventory_item::Model>, AppError> {
    if payload.additional_quantity <= 0 {
        return Err(AppError::InvalidInput(
            "Restock amount must be positive.".to_string(),
        ));
    }

    let item = db_services::restock_item(
        &app_state.db_pool,
        item_id,
        payload.additional_quantity,
        Some(user.id),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Inventory item not found".to_string()))?;

    notify_inventory_change(&app_state, &item).await;
    audit(
        &app_state,
        user.id,
        "inventory_restock",
        serde_json::json!({ "itemId": item.id, "amount": payload.additional_quantity }),
    )
    .await;

    Ok(Json(item))
}

// --- Router ---

pub fn create_inventory_router() -> Router<Arc<AppState>> {
    let engineer = Router::new()
        .route("/", post(create_item_handler))
        .route("/low", get(low_stock_handler))
        .route("/{id}/restock", post(restock_item_handler))
        .route_layer(axum_middleware::from_fn(auth::require_engineer));

    let admin = Router::new()
        .route("/{id}", put(update_item_handler).delete(delete_item_handler))
        .route_layer(axum_middleware::from_fn(auth::require_admin));

    Router::new()
        .route("/", get(list_items_handler))
        .merge(engineer)
        .merge(admin)
}
