use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::QuickQuestion;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewQuickQuestion {
    pub question: String,
}

/// POST /api/quick-help - Short-form question drop box.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewQuickQuestion>,
) -> ApiResult<QuickQuestion> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::bad_request("Question cannot be empty"));
    }

    let question = sqlx::query_as::<_, QuickQuestion>(
        r#"
        INSERT INTO quick_questions (id, user_id, question, created_at)
        VALUES ($1, $2, $3, now())
        RETURNING id, user_id, question, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.question.trim())
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(question))
}
