use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::models::SolutionEntry;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SolutionFilter {
    pub subject: Option<String>,
    pub year: Option<i32>,
}

/// GET /api/solutions - Worked past-question solutions.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SolutionFilter>,
) -> ApiResult<Vec<SolutionEntry>> {
    let solutions = sqlx::query_as::<_, SolutionEntry>(
        r#"
        SELECT id, subject_id, question, solution, exam_year, created_at
        FROM solutions
        WHERE ($1::text IS NULL OR subject_id = $1)
          AND ($2::int IS NULL OR exam_year = $2)
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(filter.subject)
    .bind(filter.year)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(solutions))
}
