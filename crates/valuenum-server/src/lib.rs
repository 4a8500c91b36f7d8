//! HTTP backend for the Value Number calculator.
//!
//! Every route lives under `/api`. Calculations are evaluated by
//! `valuenum-core` and stored with the caller identity when a bearer token
//! is presented.
//!
//! # Routes
//! - `GET  /api/` health greeting
//! - `POST /api/status`, `GET /api/status` status-check log
//! - `POST /api/notify/concepts-access` record a lead, then notify
//! - `POST /api/calculate/s-formula`, `POST /api/calculate/w-formula`
//! - `GET  /api/calculations/history?limit=N` caller's history (token required)
//! - `GET  /api/me` token claims (token required)
//!
//! # Setup
//!
//! Logging follows `RUST_LOG`.
//! ```sh
//! RUST_LOG=info,tower_http=debug JWT_SECRET=change-me valuenum-server
//! ```

use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use valuenum_core::{Config, Database};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

pub mod caller;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;

use routes::{
    concepts_access_handler, create_status_handler, history_handler, list_status_handler,
    me_handler, root_handler, s_formula_handler, w_formula_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api", get(root_handler))
        .route("/api/", get(root_handler))
        .route("/api/status", post(create_status_handler).get(list_status_handler))
        .route("/api/notify/concepts-access", post(concepts_access_handler))
        .route("/api/calculate/s-formula", post(s_formula_handler))
        .route("/api/calculate/w-formula", post(w_formula_handler))
        .route("/api/calculations/history", get(history_handler))
        .route("/api/me", get(me_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().max_age(Duration::from_secs(60 * 60));

    if origins.iter().any(|origin| origin.trim() == "*") {
        return base
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    base.allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

pub async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Loading configuration...");
    let mut config = Config::load()?;
    config.apply_env()?;

    let db_path = config.database_path()?;
    info!("Opening database at {}", db_path.display());
    let db = Database::open_at(&db_path)?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, db);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
