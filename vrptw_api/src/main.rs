mod error;
mod presets;
mod session;
mod sessions;
mod state;

use std::{sync::Arc, time::Duration};

use axum::http::Method;
use axum::routing::get;
use axum::{Router, serve};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};
use vrptw_core::adapter::RuinRecreateEngine;

use crate::presets::presets_handler;
use crate::session::SessionStore;
use crate::sessions::routes::session_routes;
use crate::state::AppState;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let state = Arc::new(AppState {
        sessions: SessionStore::default(),
        engine: Arc::new(RuinRecreateEngine::default()),
    });

    let max_idle = std::env::var("VRPTW_SESSION_IDLE_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .map_or(Duration::from_secs(DEFAULT_SESSION_IDLE_SECS), Duration::from_secs);
    tokio::spawn(evict_idle_sessions(Arc::clone(&state), max_idle));

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/presets", get(presets_handler))
        .nest("/sessions", session_routes(state))
        .layer(ServiceBuilder::new().layer(cors_layer));

    let addr = std::env::var("VRPTW_API_ADDR").unwrap_or_else(|_| String::from(DEFAULT_ADDR));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    serve(listener, app).await?;

    Ok(())
}

async fn evict_idle_sessions(state: Arc<AppState>, max_idle: Duration) {
    let mut interval = tokio::time::interval(EVICTION_INTERVAL);
    loop {
        interval.tick().await;
        let evicted = state.sessions.evict_idle(max_idle);
        if evicted > 0 {
            info!(evicted, remaining = state.sessions.count(), "evicted idle sessions");
        }
    }
}
