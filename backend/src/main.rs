//! Shipquote - Backend Server
//!
//! Cargo rate quotes for UPS, DHL and ARAMEX, the assistant tool surface and
//! the shipment request store.

use axum::{routing::get, Router};
use shared::pricing::{DirectorySource, PricingEngine};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use services::{PricingService, ShipmentEmailService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub pricing: PricingService,
    pub email: ShipmentEmailService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipquote_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Shipquote Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Warm the rate table cache; carriers that fail are retried on first use
    tracing::info!("Loading rate tables from {}", config.pricing.data_dir);
    let engine = PricingEngine::new(Arc::new(DirectorySource::new(&config.pricing.data_dir)));
    let pricing = PricingService::new(Arc::new(engine));
    let loaded = pricing.preload();
    tracing::info!("{} of 3 carrier rate tables loaded", loaded);

    let email = ShipmentEmailService::new(&config.email);
    if !email.is_enabled() {
        tracing::warn!("SQ_EMAIL__API_KEY not set, shipment notification emails are disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let timeout = Duration::from_secs(config.server.request_timeout_secs);

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config),
        pricing,
        email,
    };

    // Build application
    let app = create_app(state, timeout);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState, timeout: Duration) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Shipquote API v1"
}

/// Liveness probe
async fn health_check() -> &'static str {
    "OK"
}
