use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::ForumThread;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ThreadFilter {
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub body: String,
    pub subject: Option<String>,
}

/// GET /forum/threads - Free feature; browsable anonymously.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ThreadFilter>,
) -> ApiResult<Vec<ForumThread>> {
    let threads = sqlx::query_as::<_, ForumThread>(
        r#"
        SELECT id, author_id, subject_id, title, body, reply_count, created_at
        FROM forum_threads
        WHERE ($1::text IS NULL OR subject_id = $1)
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(filter.subject)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(threads))
}

/// GET /forum/threads/{id}
pub async fn show_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<Uuid>,
) -> ApiResult<ForumThread> {
    let thread = sqlx::query_as::<_, ForumThread>(
        r#"
        SELECT id, author_id, subject_id, title, body, reply_count, created_at
        FROM forum_threads
        WHERE id = $1
        "#,
    )
    .bind(thread_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Thread not found"))?;

    Ok(ApiResponse::success(thread))
}

/// POST /forum/threads - Posting requires a signed-in author, even though
/// reading is free.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<NewThread>,
) -> ApiResult<ForumThread> {
    let Extension(user) = user.ok_or_else(|| ApiError::unauthorized("Sign in to post"))?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::bad_request("Thread title cannot be empty"));
    }

    let thread = sqlx::query_as::<_, ForumThread>(
        r#"
        INSERT INTO forum_threads (id, author_id, subject_id, title, body, reply_count, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, now())
        RETURNING id, author_id, subject_id, title, body, reply_count, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.subject)
    .bind(payload.title.trim())
    .bind(payload.body)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(thread))
}
