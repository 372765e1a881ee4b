use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::entitlement::{AccessDecision, Feature};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Where the SPA sends users the guard turned away.
pub const SIGN_IN_REDIRECT: &str = "/auth/login";
pub const UPGRADE_REDIRECT: &str = "/subscriptions/upgrade";

/// Route guard over the entitlement resolver. Mounted per feature route:
///
/// ```ignore
/// .route_layer(middleware::from_fn_with_state(
///     (state.clone(), Feature::Quizzes),
///     entitlement_guard,
/// ))
/// ```
///
/// Nothing is rendered until the resolver's provider reads settle; the
/// three outcomes map to exactly one response shape each.
pub async fn entitlement_guard(
    State((state, feature)): State<(Arc<AppState>, Feature)>,
    request: Request,
    next: Next,
) -> Response {
    let user_id = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.user_id);

    match state.resolver.resolve(user_id, feature).await {
        AccessDecision::Allowed(_) => next.run(request).await,
        AccessDecision::Unauthenticated => sign_in_required(feature),
        AccessDecision::Denied => upgrade_required(feature),
    }
}

/// 401 with a sign-in prompt; the client should come back with a session.
pub fn sign_in_required(feature: Feature) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": true,
            "message": format!("Sign in to access {}", feature),
            "code": "SIGN_IN_REQUIRED",
            "redirect": SIGN_IN_REDIRECT
        })),
    )
        .into_response()
}

/// 403 with an upgrade prompt; the account exists but lacks the tier.
pub fn upgrade_required(feature: Feature) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": true,
            "message": format!("A premium subscription is required for {}", feature),
            "code": "UPGRADE_REQUIRED",
            "redirect": UPGRADE_REDIRECT
        })),
    )
        .into_response()
}
