//! RBAC Admin Server
//!
//! Serves the `/api/v1` user administration API, health checks and the
//! exported static frontend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rbac_api::AppState;
use rbac_core::config::{AppConfig, DatabaseConfig};
use rbac_db::{Database, MemoryUserStore, PgUserStore, UserStore};
use rbac_services::{ensure_admin, UserContract};

mod health;

use health::HealthChecker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::load(None)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting RBAC Admin"
    );

    let (store, backend) = open_store(&config).await;

    if let (Some(username), Some(password)) =
        (&config.auth.admin_username, &config.auth.admin_password)
    {
        let contract = UserContract::new(config.auth.password_min_length);
        ensure_admin(store.as_ref(), username, password, contract).await?;
    }

    let health = Arc::new(HealthChecker::new(store.clone(), backend));
    let state = AppState::new(store, &config);
    let app = build_router(state, health, &config);

    let addr = config.server_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,rbac_server=debug,rbac_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// PostgreSQL when a URL is configured and reachable, memory otherwise
async fn open_store(config: &AppConfig) -> (Arc<dyn UserStore>, &'static str) {
    if let Some(url) = &config.database.url {
        match connect_postgres(url, &config.database).await {
            Ok(store) => {
                info!("Connected to database");
                return (Arc::new(store), "postgres");
            }
            Err(e) => {
                warn!("Failed to connect to database: {}. Running with in-memory users.", e);
            }
        }
    } else {
        info!("No DATABASE_URL set, keeping users in memory");
    }
    (Arc::new(MemoryUserStore::new()), "memory")
}

async fn connect_postgres(url: &str, config: &DatabaseConfig) -> anyhow::Result<PgUserStore> {
    let db = Database::connect(url, config).await?;
    let store = PgUserStore::new(db.pool().clone());
    store.ensure_schema().await?;
    Ok(store)
}

/// Build the application router
fn build_router(state: AppState, health: Arc<HealthChecker>, config: &AppConfig) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    let mut app = rbac_api::router().with_state(state).merge(health_routes);

    if let Some(dir) = frontend_dir(config) {
        info!(dir = %dir.display(), "Serving frontend");
        let frontend = ServeDir::new(&dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback(move |req: Request| serve_frontend(frontend.clone(), req));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.server.cors_origins)),
    )
}

fn frontend_dir(config: &AppConfig) -> Option<PathBuf> {
    if !config.frontend.enabled {
        return None;
    }
    let dir = Path::new(&config.frontend.static_dir);
    if dir.is_dir() {
        Some(dir.to_path_buf())
    } else {
        warn!(dir = %dir.display(), "Frontend directory not found, serving API only");
        None
    }
}

/// Unknown API paths stay JSON 404s; everything else is a frontend page
async fn serve_frontend(frontend: ServeDir<ServeFile>, req: Request) -> Response {
    if req.uri().path().starts_with("/api/") {
        return rbac_api::not_found().await.into_response();
    }
    match frontend.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Any origin without credentials, or the configured origins with
/// credentials so the auth cookie is sent cross-site
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
