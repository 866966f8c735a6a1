use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::calendar_event;
use crate::db::services as db_services;
use crate::web::middleware::auth;
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateEventRequest {
    title: String,
    description: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

async fn list_events_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<calendar_event::Model>>, AppError> {
    let events = db_services::list_events(&app_state.db_pool).await?;
    Ok(Json(events))
}

async fn create_event_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<calendar_event::Model>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Event title must not be empty.".to_string(),
        ));
    }
    if payload.ends_at <= payload.starts_at {
        return Err(AppError::InvalidInput(
            "Event end must be after its start.".to_string(),
        ));
    }

    let event = db_services::create_event(
        &app_state.db_pool,
        user.id,
        payload.title,
        payload.description,
        payload.starts_at,
        payload.ends_at,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub fn create_event_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_events_handler).post(create_event_handler))
        .route_layer(axum_middleware::from_fn(auth::require_engineer))
}
