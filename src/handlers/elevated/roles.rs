use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Role, RoleAssignment};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::RoleService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: Uuid,
    pub role: Role,
}

/// POST /api/admin/roles - Assign a role to a user. Admin only.
pub async fn assign(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<RoleAssignment> {
    let service = RoleService::new(state.pool.clone());
    let assignment = service.assign_role(payload.user_id, payload.role).await?;

    // The role change must be visible to the resolver immediately
    state.roles.invalidate(payload.user_id).await;

    tracing::info!(
        "Admin {} assigned role {} to user {}",
        admin.user_id,
        payload.role,
        payload.user_id
    );

    Ok(ApiResponse::created(assignment))
}
