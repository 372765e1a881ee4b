use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::HomeworkRequest;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewHomeworkRequest {
    pub subject_id: String,
    pub question: String,
}

/// GET /api/homework - The caller's own help requests.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<HomeworkRequest>> {
    let requests = sqlx::query_as::<_, HomeworkRequest>(
        r#"
        SELECT id, user_id, subject_id, question, answered, created_at
        FROM homework_requests
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(requests))
}

/// POST /api/homework - Submit a help request for a tutor to pick up.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewHomeworkRequest>,
) -> ApiResult<HomeworkRequest> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::bad_request("Question cannot be empty"));
    }

    let request = sqlx::query_as::<_, HomeworkRequest>(
        r#"
        INSERT INTO homework_requests (id, user_id, subject_id, question, answered, created_at)
        VALUES ($1, $2, $3, $4, false, now())
        RETURNING id, user_id, subject_id, question, answered, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(&payload.subject_id)
    .bind(payload.question.trim())
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(request))
}
