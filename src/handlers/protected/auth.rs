use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Role;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub user_id: Uuid,
    pub name: String,
    pub roles: Vec<Role>,
}

/// GET /api/auth/whoami - Echo the authenticated session.
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<WhoamiResponse> {
    let mut roles: Vec<Role> = user.roles.iter().copied().collect();
    roles.sort_by_key(Role::as_str);

    Ok(ApiResponse::success(WhoamiResponse {
        user_id: user.user_id,
        name: user.name,
        roles,
    }))
}
