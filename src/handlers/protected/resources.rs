use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::models::ResourceDoc;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceFilter {
    pub subject: Option<String>,
}

/// GET /api/resources - Uploaded study documents. Rows carry storage paths;
/// the object store itself serves the bytes.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ResourceFilter>,
) -> ApiResult<Vec<ResourceDoc>> {
    let resources = sqlx::query_as::<_, ResourceDoc>(
        r#"
        SELECT id, subject_id, title, storage_path, created_at
        FROM resources
        WHERE ($1::text IS NULL OR subject_id = $1)
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(filter.subject)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(resources))
}
