use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Subscription;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SubscriptionService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/admin/subscriptions - Platform-wide subscription listing.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Subscription>> {
    let service = SubscriptionService::new(state.pool.clone());
    let subscriptions = service.list_all(query.limit.unwrap_or(100)).await?;

    Ok(ApiResponse::success(subscriptions))
}

#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub expired_users: Vec<Uuid>,
    pub count: usize,
}

/// POST /api/admin/subscriptions/sweep - Mark overdue active rows expired
/// and invalidate the affected users' cached reads.
pub async fn sweep(State(state): State<Arc<AppState>>) -> ApiResult<SweepResult> {
    let service = SubscriptionService::new(state.pool.clone());
    let expired_users = service.sweep_expired().await?;

    for user_id in &expired_users {
        state.subscriptions.invalidate(*user_id).await;
    }

    tracing::info!("Expiry sweep touched {} users", expired_users.len());

    Ok(ApiResponse::success(SweepResult {
        count: expired_users.len(),
        expired_users,
    }))
}
