use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::document;
use crate::db::services as db_services;
use crate::web::middleware::auth;
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    title: String,
    storage_path: String,
    category: String,
    doc_type: Option<String>,
    department: Option<String>,
}

async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<document::Model>>, AppError> {
    let documents = db_services::list_documents(&app_state.db_pool).await?;
    Ok(Json(documents))
}

async fn create_document_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<document::Model>), AppError> {
    if payload.title.trim().is_empty()
        || payload.storage_path.trim().is_empty()
        || payload.category.trim().is_empty()
    {
        return Err(AppError::InvalidInput(
            "Title, storage path and category must not be empty.".to_string(),
        ));
    }

    let document = db_services::create_document(
        &app_state.db_pool,
        user.id,
        payload.title,
        payload.storage_path,
        payload.category,
        payload.doc_type,
        payload.department,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

async fn delete_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(document_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let delete_result = db_services::delete_document(&app_state.db_pool, document_id).await?;
    if delete_result.rows_affected == 0 {
        return Err(AppError::NotFound("Document not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_document_router() -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/{id}", delete(delete_document_handler))
        .route_layer(axum_middleware::from_fn(auth::require_admin));

    Router::new()
        .route(
            "/",
            get(list_documents_handler).post(create_document_handler),
        )
        .route_layer(axum_middleware::from_fn(auth::require_engineer))
        .merge(admin)
}
