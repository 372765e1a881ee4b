use axum::extract::{Path, Query, State};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Quiz;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuizFilter {
    pub subject: Option<String>,
    pub topic: Option<String>,
}

/// GET /api/quizzes - Premium feature; the guard has already decided.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<QuizFilter>,
) -> ApiResult<Vec<Quiz>> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, subject_id, title, topic, question_count, created_at
        FROM quizzes
        WHERE ($1::text IS NULL OR subject_id = $1)
          AND ($2::text IS NULL OR topic = $2)
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(filter.subject)
    .bind(filter.topic)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(quizzes))
}

/// GET /api/quizzes/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
) -> ApiResult<Quiz> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, subject_id, title, topic, question_count, created_at
        FROM quizzes
        WHERE id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Quiz not found"))?;

    Ok(ApiResponse::success(quiz))
}
