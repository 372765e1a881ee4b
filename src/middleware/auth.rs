use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config;
use crate::database::models::Role;
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub roles: HashSet<Role>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            name: claims.name,
            roles: claims.roles.into_iter().collect(),
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context.
/// Rejects requests without a valid bearer token.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Validate and decode JWT
    let claims = validate_jwt(&token).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Convert claims to AuthUser and inject into request
    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok::<_, (StatusCode, Json<serde_json::Value>)>(next.run(request).await)
}

/// Best-effort authentication for routes that anonymous visitors may reach.
/// A valid bearer token injects an AuthUser; a missing or invalid token
/// leaves the request anonymous so the entitlement guard can answer with a
/// sign-in prompt instead of a bare 401.
pub async fn optional_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(token) = extract_jwt_from_headers(&headers) {
        match validate_jwt(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            Err(msg) => {
                tracing::warn!("Ignoring invalid bearer token: {}", msg);
            }
        }
    }

    next.run(request).await
}

/// Gate for the administrative surface. Requires an authenticated user
/// holding the admin role; the teacher role does not qualify.
pub async fn require_admin_middleware(
    request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let is_admin = request
        .extensions()
        .get::<AuthUser>()
        .map(AuthUser::is_admin)
        .unwrap_or(false);

    if !is_admin {
        let api_error = ApiError::forbidden("Administrator role required");
        return Err((
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        ));
    }

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
