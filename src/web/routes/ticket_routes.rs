use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::ticket;
use crate::db::enums::TicketStatus;
use crate::db::services as db_services;
use crate::web::middleware::auth;
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

// --- Request Structs ---

#[derive(Deserialize)]
pub struct CreateTicketRequest {
    title: String,
    description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTicketStatusRequest {
    status: TicketStatus,
}

#[derive(Deserialize)]
pub struct AssignTicketRequest {
    assignee_id: Option<i32>,
}

// --- Route Handlers ---

/// Admins see every ticket; everyone else sees only their own.
async fn list_tickets_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ticket::Model>>, AppError> {
    let tickets = if user.role.is_admin() {
        db_services::list_tickets(&app_state.db_pool).await?
    } else {
        db_services::list_tickets_for_user(&app_state.db_pool, user.id).await?
    };
    Ok(Json(tickets))
}

async fn create_ticket_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<ticket::Model>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Ticket title must not be empty.".to_string(),
        ));
    }

    let ticket = db_services::create_ticket(
        &app_state.db_pool,
        user.id,
        payload.title,
        payload.description,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn update_status_handler(
    State(app_state): State<Arc<AppState>>,
    Path(ticket_id): Path<i32>,
    Json(payload): Json<UpdateTicketStatusRequest>,
) -> Result<Json<ticket::Model>, AppError> {
    let ticket =
        db_services::update_ticket_status(&app_state.db_pool, ticket_id, payload.status).await?;
    Ok(Json(ticket))
}

async fn assign_ticket_handler(
    State(app_state): State<Arc<AppState>>,
    Path(ticket_id): Path<i32>,
    Json(payload): Json<AssignTicketRequest>,
) -> Result<Json<ticket::Model>, AppError> {
    if let Some(assignee_id) = payload.assignee_id {
        db_services::find_user_by_id(&app_state.db_pool, assignee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignee not found".to_string()))?;
    }

    let ticket =
        db_services::assign_ticket(&app_state.db_pool, ticket_id, payload.assignee_id).await?;
    Ok(Json(ticket))
}

// --- Router ---

pub fn create_ticket_router() -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/{id}/status", put(update_status_handler))
        .route("/{id}/assign", put(assign_ticket_handler))
        .route_layer(axum_middleware::from_fn(auth::require_admin));

    Router::new()
        .route("/", get(list_tickets_handler).post(create_ticket_handler))
        .merge(admin)
}
