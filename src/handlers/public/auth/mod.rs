pub mod utils;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{generate_jwt, password, Claims};
use crate::database::models::{Role, User};
use crate::entitlement::RoleProvider;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: Uuid,
    pub name: String,
    pub roles: Vec<Role>,
}

/// POST /auth/register - Create an account and issue a session token.
/// New accounts start with the student role.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<SessionResponse> {
    let mut field_errors = HashMap::new();
    if let Err(msg) = utils::validate_name_format(&payload.name) {
        field_errors.insert("name".to_string(), msg);
    }
    if let Err(msg) = utils::validate_email_format(&payload.email) {
        field_errors.insert("email".to_string(), msg);
    }
    if let Err(msg) = utils::validate_password_format(&payload.password) {
        field_errors.insert("password".to_string(), msg);
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Invalid registration details",
            Some(field_errors),
        ));
    }

    let email = payload.email.trim().to_lowercase();

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND deleted_at IS NULL")
            .bind(&email)
            .fetch_optional(&state.pool)
            .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let password_hash = password::hash_password(&payload.password)
        .map_err(ApiError::internal_server_error)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, now(), now())
        RETURNING id, name, email, password_hash, created_at, updated_at, deleted_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await?;

    sqlx::query("INSERT INTO user_roles (user_id, role, assigned_at) VALUES ($1, $2, now())")
        .bind(user.id)
        .bind(Role::Student)
        .execute(&state.pool)
        .await?;

    let roles = vec![Role::Student];
    let token = generate_jwt(Claims::new(user.id, user.name.clone(), roles.clone()))?;

    tracing::info!("Registered new account {}", user.id);

    Ok(ApiResponse::created(SessionResponse {
        token,
        user_id: user.id,
        name: user.name,
        roles,
    }))
}

/// POST /auth/login - Verify credentials and issue a session token carrying
/// the user's current roles.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let email = payload.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, created_at, updated_at, deleted_at
        FROM users
        WHERE email = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let verified = password::verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::internal_server_error)?;

    if !verified {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    // Roles come from the provider (cached) so a fresh assignment shows up
    // in the next token without waiting for re-registration.
    let roles: Vec<Role> = state
        .roles
        .roles(user.id)
        .await
        .map(|set| set.into_iter().collect())
        .unwrap_or_else(|e| {
            tracing::warn!("Role fetch failed during login for {}: {}", user.id, e);
            Vec::new()
        });

    let token = generate_jwt(Claims::new(user.id, user.name.clone(), roles.clone()))?;

    Ok(ApiResponse::success(SessionResponse {
        token,
        user_id: user.id,
        name: user.name,
        roles,
    }))
}
