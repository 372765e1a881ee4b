use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::entitlement::Feature;
use crate::middleware::{
    entitlement_guard, jwt_auth_middleware, optional_auth_middleware, require_admin_middleware,
};
use crate::state::AppState;

/// Assemble the full router over injected state. Tests call this with
/// in-memory providers; `main` calls it with the database-backed wiring.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health).with_state(state.clone()))
        // Public auth routes
        .merge(auth_public_routes(state.clone()))
        // Free features (still evaluated through the guard)
        .merge(free_feature_routes(state.clone()))
        // Protected API
        .merge(api_routes(state.clone()))
        // Admin API
        .merge(admin_routes(state))
        // Global middleware
        .layer(middleware::from_fn(optional_auth_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes(state: Arc<AppState>) -> Router {
    use crate::handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state)
}

fn free_feature_routes(state: Arc<AppState>) -> Router {
    use crate::handlers::public::{forum, subjects};

    let subject_routes = Router::new()
        .route("/subjects", get(subjects::list))
        .route("/subjects/:id", get(subjects::show))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Feature::SubjectBrowsing),
            entitlement_guard,
        ))
        .with_state(state.clone());

    // Reading the forum is free; posting checks for a session in-handler
    let forum_routes = Router::new()
        .route(
            "/forum/threads",
            get(forum::list_threads).post(forum::create_thread),
        )
        .route("/forum/threads/:id", get(forum::show_thread))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Feature::Forum),
            entitlement_guard,
        ))
        .with_state(state);

    subject_routes.merge(forum_routes)
}

fn api_routes(state: Arc<AppState>) -> Router {
    use crate::handlers::protected::{
        access, auth, dashboard, flashcards, homework, quick_help, quizzes, resources, solutions,
        subscriptions,
    };

    // Decision endpoint for the SPA's route guard; evaluates for anonymous
    // viewers too, so no auth requirement here
    let access_routes = Router::new()
        .route("/api/access", get(access::catalog))
        .route("/api/access/:feature", get(access::check))
        .with_state(state.clone());

    // Account surface: authentication required, no feature gate
    let account_routes = Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route(
            "/api/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route(
            "/api/subscriptions/:subject/active",
            get(subscriptions::active),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware))
        .with_state(state.clone());

    // Premium features, one guard each
    let quiz_routes = feature_router(
        Router::new()
            .route("/api/quizzes", get(quizzes::list))
            .route("/api/quizzes/:id", get(quizzes::show)),
        Feature::Quizzes,
        &state,
    );
    let flashcard_routes = feature_router(
        Router::new().route("/api/flashcards", get(flashcards::list)),
        Feature::Flashcards,
        &state,
    );
    let resource_routes = feature_router(
        Router::new().route("/api/resources", get(resources::list)),
        Feature::Resources,
        &state,
    );
    let solution_routes = feature_router(
        Router::new().route("/api/solutions", get(solutions::list)),
        Feature::SolutionBank,
        &state,
    );

    // Per-user features additionally require a session for row ownership
    let homework_routes = feature_router(
        Router::new()
            .route("/api/homework", get(homework::list).post(homework::create))
            .route_layer(middleware::from_fn(jwt_auth_middleware)),
        Feature::HomeworkHelp,
        &state,
    );
    let quick_help_routes = feature_router(
        Router::new()
            .route("/api/quick-help", post(quick_help::create))
            .route_layer(middleware::from_fn(jwt_auth_middleware)),
        Feature::QuickHelp,
        &state,
    );
    let dashboard_routes = feature_router(
        Router::new()
            .route("/api/dashboard", get(dashboard::summary))
            .route_layer(middleware::from_fn(jwt_auth_middleware)),
        Feature::StudentDashboard,
        &state,
    );

    access_routes
        .merge(account_routes)
        .merge(quiz_routes)
        .merge(flashcard_routes)
        .merge(resource_routes)
        .merge(solution_routes)
        .merge(homework_routes)
        .merge(quick_help_routes)
        .merge(dashboard_routes)
}

/// Wrap a feature's routes with its entitlement guard and bind state.
fn feature_router(
    routes: Router<Arc<AppState>>,
    feature: Feature,
    state: &Arc<AppState>,
) -> Router {
    routes
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), feature),
            entitlement_guard,
        ))
        .with_state(state.clone())
}

fn admin_routes(state: Arc<AppState>) -> Router {
    use crate::handlers::elevated::{roles, subscriptions};

    Router::new()
        .route("/api/admin/roles", post(roles::assign))
        .route(
            "/api/admin/subscriptions",
            get(subscriptions::list),
        )
        .route("/api/admin/subscriptions/sweep", post(subscriptions::sweep))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "StudyHall API (Rust)",
            "version": version,
            "description": "Backend API for the StudyHall JSS learning portal",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public)",
                "subjects": "/subjects[/:id] (free)",
                "forum": "/forum/threads[/:id] (free; posting requires sign-in)",
                "access": "/api/access/:feature (decision endpoint)",
                "account": "/api/auth/whoami, /api/subscriptions (authenticated)",
                "features": "/api/quizzes, /api/flashcards, /api/resources, /api/solutions, /api/homework, /api/quick-help, /api/dashboard (premium-gated)",
                "admin": "/api/admin/* (admin role required)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
