use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use bcrypt::{hash, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::entities::audit_log;
use crate::db::enums::{ItemCategory, TicketStatus, UserRole};
use crate::db::services as db_services;
use crate::alerting::threshold;
use crate::web::middleware::auth;
use crate::web::models::{AuthenticatedUser, UserResponse};
use crate::web::routes::{audit, settings_routes};
use crate::web::{AppError, AppState};

const AUDIT_PAGE_SIZE: u64 = 100;

// --- Request/Response Structs ---

#[derive(Deserialize)]
pub struct CreateUserRequest {
    name: String,
    email: String,
    password: String,
    role: UserRole,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    name: String,
    email: String,
    role: UserRole,
    password: Option<String>,
}

#[derive(Serialize)]
pub struct AdminStatsResponse {
    users_count: u64,
    consumables_count: usize,
    materials_count: usize,
    low_stock_count: usize,
    open_tickets: usize,
    total_stock_value: f64,
}

// --- Route Handlers ---

async fn list_users_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = db_services::list_users(&app_state.db_pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn create_user_handler(
    Extension(acting_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Name and email must not be empty.".to_string(),
        ));
    }
    if payload.password.len() < 6 {
        return Err(AppError::InvalidInput(
            "Password should be at least 6 characters.".to_string(),
        ));
    }

    let existing = db_services::find_user_by_email(&app_state.db_pool, &payload.email).await?;
    if existing.is_some() {
        return Err(AppError::UserAlreadyExists(
            "Email is already registered.".to_string(),
        ));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(format!("Password hashing failed: {e}")))?;

    let user = db_services::create_user(
        &app_state.db_pool,
        payload.name,
        payload.email,
        password_hash,
        payload.role,
    )
    .await?;

    audit(
        &app_state,
        acting_user.id,
        "user_create",
        serde_json::json!({ "userId": user.id }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn update_user_handler(
    Extension(acting_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Name and email must not be empty.".to_string(),
        ));
    }

    let password_hash = match payload.password {
        Some(password) if !password.is_empty() => {
            if password.len() < 6 {
                return Err(AppError::InvalidInput(
                    "Password should be at least 6 characters.".to_string(),
                ));
            }
            Some(hash(&password, DEFAULT_COST).map_err(|e| {
                AppError::PasswordHashingError(format!("Password hashing failed: {e}"))
            })?)
        }
        _ => None,
    };

    let user = db_services::update_user(
        &app_state.db_pool,
        user_id,
        payload.name,
        payload.email,
        payload.role,
        password_hash,
    )
    .await?;

    audit(
        &app_state,
        acting_user.id,
        "user_edit",
        serde_json::json!({ "userId": user.id }),
    )
    .await;

    Ok(Json(UserResponse::from(user)))
}

async fn delete_user_handler(
    Extension(acting_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if user_id == acting_user.id {
        return Err(AppError::Forbidden(
            "You cannot delete your own account.".to_string(),
        ));
    }

    let delete_result = db_services::delete_user(&app_state.db_pool, user_id).await?;
    if delete_result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    audit(
        &app_state,
        acting_user.id,
        "user_delete",
        serde_json::json!({ "userId": user_id }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

async fn stats_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<AdminStatsResponse>, AppError> {
    let items = db_services::list_items(&app_state.db_pool, None).await?;
    let tickets = db_services::list_tickets(&app_state.db_pool).await?;
    let users_count = db_services::count_users(&app_state.db_pool).await?;

    let consumables_count = items
        .iter()
        .filter(|item| item.category == ItemCategory::Consumable)
        .count();
    let materials_count = items
        .iter()
        .filter(|item| item.category == ItemCategory::Material)
        .count();
    let low_stock_count = items.iter().filter(|item| threshold::is_low(item)).count();
    let total_stock_value = items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum();
    let open_tickets = tickets
        .iter()
        .filter(|ticket| ticket.status == TicketStatus::Open)
        .count();

    Ok(Json(AdminStatsResponse {
        users_count,
        consumables_count,
        materials_count,
        low_stock_count,
        open_tickets,
        total_stock_value,
    }))
}

async fn audit_log_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<audit_log::Model>>, AppError> {
    let entries = db_services::list_recent_actions(&app_state.db_pool, AUDIT_PAGE_SIZE).await?;
    Ok(Json(entries))
}

// --- Router ---

pub fn create_admin_router() -> Router<Arc<AppState>> {
    let super_admin = Router::new()
        .route("/users", post(create_user_handler))
        .route(
            "/users/{id}",
            put(update_user_handler).delete(delete_user_handler),
        )
        .merge(settings_routes::create_settings_router())
        .route_layer(axum_middleware::from_fn(auth::require_super_admin));

    Router::new()
        .route("/users", get(list_users_handler))
        .route("/stats", get(stats_handler))
        .route("/audit", get(audit_log_handler))
        .merge(super_admin)
        .route_layer(axum_middleware::from_fn(auth::require_admin))
}
