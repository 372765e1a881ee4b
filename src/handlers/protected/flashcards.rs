use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::models::FlashcardSet;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FlashcardFilter {
    pub subject: Option<String>,
}

/// GET /api/flashcards - Flashcard sets, optionally filtered by subject.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FlashcardFilter>,
) -> ApiResult<Vec<FlashcardSet>> {
    let sets = sqlx::query_as::<_, FlashcardSet>(
        r#"
        SELECT id, subject_id, title, card_count, created_at
        FROM flashcard_sets
        WHERE ($1::text IS NULL OR subject_id = $1)
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(filter.subject)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(sets))
}
