use studyhall_api_rust::app::app;
use studyhall_api_rust::database::DatabaseManager;
use studyhall_api_rust::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = studyhall_api_rust::config::config();
    tracing_subscriber::fmt::init();

    tracing::info!("Starting StudyHall API in {:?} mode", config.environment);

    if studyhall_api_rust::is_development!() {
        tracing::debug!("Development mode: permissive CORS, verbose logging");
    }

    // Startup diagnostics; the server still comes up if the database is
    // briefly unreachable since pools connect lazily
    if let Err(e) = DatabaseManager::health_check().await {
        tracing::warn!("Database not reachable at startup: {}", e);
    }

    let state = match AppState::from_env().await {
        Ok(state) => state,
        Err(e) => panic!("failed to initialize application state: {}", e),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("STUDYHALL_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 StudyHall API server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    DatabaseManager::close().await;
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received");
}
