use axum::extract::{Path, State};
use std::sync::Arc;

use crate::database::models::Subject;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /subjects - Browse the curriculum catalog. Free feature.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Subject>> {
    let subjects = sqlx::query_as::<_, Subject>(
        "SELECT id, title, description, grade_levels, created_at FROM subjects ORDER BY title",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(subjects))
}

/// GET /subjects/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<String>,
) -> ApiResult<Subject> {
    let subject = sqlx::query_as::<_, Subject>(
        "SELECT id, title, description, grade_levels, created_at FROM subjects WHERE id = $1",
    )
    .bind(&subject_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Subject not found: {}", subject_id)))?;

    Ok(ApiResponse::success(subject))
}
