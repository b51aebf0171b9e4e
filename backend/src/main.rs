use std::net::SocketAddr;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod rest;
mod store;

use rest::AppState;
use store::ResultStore;

/// Server settings, overridable through the environment
#[derive(Debug, Clone)]
struct ServerConfig {
    addr: SocketAddr,
    frontend_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            frontend_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("LOTTERY_BACKEND_ADDR") {
            config.addr = addr.parse()?;
        }
        if let Ok(origin) = std::env::var("LOTTERY_FRONTEND_ORIGIN") {
            config.frontend_origin = origin;
        }
        Ok(config)
    }
}

fn router(state: AppState, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .route("/lotteries", get(rest::list_lotteries))
        .route("/results", post(rest::submit_result))
        .route("/results/auto-save", post(rest::auto_save_ticket))
        .route("/results/:id", get(rest::get_result))
        .route("/logs", post(rest::ingest_log));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(ResultStore::new());

    // CORS setup to allow the frontend dev server to make requests
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = router(state, cors);

    info!("Starting server on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
