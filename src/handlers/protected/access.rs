use axum::extract::{Path, State};
use axum::Extension;
use serde::Serialize;
use std::sync::Arc;

use crate::entitlement::{AccessDecision, Feature, FeatureTier, Grant};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, SIGN_IN_REDIRECT, UPGRADE_REDIRECT};
use crate::state::AppState;

/// What the SPA's route guard branches on. `redirect` is only present when
/// access was not granted.
#[derive(Debug, Serialize)]
pub struct AccessReport {
    pub feature: String,
    pub outcome: &'static str,
    pub allowed: bool,
    pub bypass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant: Option<Grant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct FeatureClassification {
    pub feature: Feature,
    pub tier: &'static str,
}

/// GET /api/access - The feature classification table, for auditing which
/// features the free tier currently covers.
pub async fn catalog(State(state): State<Arc<AppState>>) -> ApiResult<Vec<FeatureClassification>> {
    let catalog = state.resolver.catalog();

    let classifications = Feature::ALL
        .iter()
        .map(|&feature| FeatureClassification {
            feature,
            tier: match catalog.tier(feature) {
                FeatureTier::Free => "free",
                FeatureTier::Premium => "premium",
            },
        })
        .collect();

    Ok(ApiResponse::success(classifications))
}

/// GET /api/access/{feature} - Evaluate entitlement for the current viewer.
///
/// Accepts raw feature names so the SPA can ask about routes this backend
/// version doesn't know yet; unknown names evaluate as premium-required.
pub async fn check(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthUser>>,
    Path(feature): Path<String>,
) -> ApiResult<AccessReport> {
    let user_id = user.map(|Extension(user)| user.user_id);
    let decision = state.resolver.resolve_named(user_id, &feature).await;

    let redirect = match decision {
        AccessDecision::Allowed(_) => None,
        AccessDecision::Unauthenticated => Some(SIGN_IN_REDIRECT),
        AccessDecision::Denied => Some(UPGRADE_REDIRECT),
    };

    Ok(ApiResponse::success(AccessReport {
        feature,
        outcome: decision.outcome_str(),
        allowed: decision.is_allowed(),
        bypass: decision.bypass(),
        grant: decision.grant(),
        redirect,
    }))
}
