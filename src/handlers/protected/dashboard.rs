use axum::extract::State;
use axum::Extension;
use serde::Serialize;
use std::sync::Arc;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub name: String,
    pub subscription_count: i64,
    pub open_homework_requests: i64,
    pub forum_threads_started: i64,
}

/// GET /api/dashboard - Student landing page summary.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<DashboardSummary> {
    let (subscription_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user.user_id)
            .fetch_one(&state.pool)
            .await?;

    let (open_homework_requests,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM homework_requests WHERE user_id = $1 AND answered = false",
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let (forum_threads_started,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM forum_threads WHERE author_id = $1")
            .bind(user.user_id)
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(DashboardSummary {
        name: user.name,
        subscription_count,
        open_homework_requests,
        forum_threads_started,
    }))
}
