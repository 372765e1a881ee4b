use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::models::{Subscription, SubscriptionTier};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::SubscriptionService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewSubscription {
    pub subject_id: String,
    /// Defaults to free when omitted.
    pub tier: Option<SubscriptionTier>,
}

/// GET /api/subscriptions - The caller's own subscription history.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Subscription>> {
    let service = SubscriptionService::new(state.pool.clone());
    let subscriptions = service.list_for(user.user_id).await?;

    Ok(ApiResponse::success(subscriptions))
}

/// GET /api/subscriptions/{subject}/active - The one subscription currently
/// counting for a subject, if any. When history holds several valid rows
/// the most recently started wins.
pub async fn active(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(subject_id): Path<String>,
) -> ApiResult<Option<Subscription>> {
    let service = SubscriptionService::new(state.pool.clone());
    let subscription = service
        .get_active_subscription(user.user_id, &subject_id)
        .await?;

    Ok(ApiResponse::success(subscription))
}

/// POST /api/subscriptions - Subscribe to a subject. Free unless premium is
/// requested; premium runs for exactly one year.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewSubscription>,
) -> ApiResult<Subscription> {
    let tier = payload.tier.unwrap_or(SubscriptionTier::Free);

    let service = SubscriptionService::new(state.pool.clone());
    let subscription = service
        .create_subscription(Some(user.user_id), &payload.subject_id, tier)
        .await?;

    // The resolver must see the new entitlement on its next evaluation
    state.subscriptions.invalidate(user.user_id).await;

    tracing::info!(
        "User {} subscribed to {} at tier {}",
        user.user_id,
        subscription.subject_id,
        subscription.tier
    );

    Ok(ApiResponse::created(subscription))
}
