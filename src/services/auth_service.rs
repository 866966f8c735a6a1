use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;

use crate::db::entities::user;
use crate::db::enums::UserRole;
use crate::db::services as db_services;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse};

/// Bootstrap registration: only the very first account may self-register and it
/// becomes the super-admin. Every later account is created by a super-admin
/// through the admin API.
pub async fn register_user(
    db: &DatabaseConnection,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    if req.name.is_empty() || req.email.is_empty() {
        return Err(AppError::InvalidInput(
            "Name and email must not be empty.".to_string(),
        ));
    }
    if req.password.len() < 6 {
        return Err(AppError::InvalidInput(
            "Password should be at least 6 characters.".to_string(),
        ));
    }

    let user_count = db_services::count_users(db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count users: {e}")))?;
    if user_count > 0 {
        return Err(AppError::Forbidden(
            "Registration is disabled. Please ask an administrator to create an account."
                .to_string(),
        ));
    }

    let password_hash = hash(&req.password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(format!("Password hashing failed: {e}")))?;

    let user_model = db_services::create_user(
        db,
        req.name,
        req.email,
        password_hash,
        UserRole::SuperAdmin,
    )
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {e}")))?;

    Ok(UserResponse::from(user_model))
}

/// Email/password login. Invalid email and invalid password produce the same
/// error so a caller cannot probe which accounts exist.
pub async fn login_user(
    db: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password must not be empty.".to_string(),
        ));
    }

    let user = db_services::find_user_by_email(db, &req.email)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to look up user: {e}")))?
        .ok_or(AppError::InvalidCredentials)?;

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(
    user: &user::Model,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let now = Utc::now();
    // Token valid for 24 hours
    let expiration = (now + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        role: user.role.clone(),
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(format!("Failed to create token: {e}")))?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        name: user.name.clone(),
        role: user.role.clone(),
    })
}
