use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use tracing::warn;

use crate::db::enums::UserRole;
use crate::web::models::{AuthenticatedUser, Claims};
use crate::web::{error::AppError, AppState};

pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let jwt_secret = &state.config.jwt_secret;

    // Try to get token from Authorization header first, then fall back to cookie
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
        .ok_or(AppError::InvalidCredentials)?;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "JWT decoding error during auth middleware.");
        AppError::InvalidCredentials
    })?;

    let authenticated_user = AuthenticatedUser {
        id: token_data.claims.user_id,
        email: token_data.claims.sub,
        role: token_data.claims.role,
    };
    req.extensions_mut().insert(authenticated_user);
    Ok(next.run(req).await)
}

async fn require_role(
    required: UserRole,
    req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(AppError::InvalidCredentials)?;

    if user.role.can_act_as(&required) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Forbidden("Access denied.".to_string()))
    }
}

pub async fn require_engineer(req: Request<AxumBody>, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::Engineer, req, next).await
}

pub async fn require_accountant(req: Request<AxumBody>, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::Accountant, req, next).await
}

pub async fn require_admin(req: Request<AxumBody>, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::Admin, req, next).await
}

pub async fn require_super_admin(
    req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    require_role(UserRole::SuperAdmin, req, next).await
}
