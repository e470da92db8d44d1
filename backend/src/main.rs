//! Harvest crop planner - Backend Server
//!
//! Recommends crops for a parcel month by month and builds 12-month rotation plans
//! from reference data loaded at startup.

use axum::{routing::get, Router};
use shared::InMemoryCatalog;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;
use external::ImageSendClient;
use services::CatalogLoader;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<InMemoryCatalog>,
    pub config: Arc<Config>,
    pub image_client: Option<ImageSendClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harvest_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Harvest crop planner");
    tracing::info!("Environment: {}", config.environment);

    // Load reference data
    tracing::info!("Loading catalog from {}", config.data.dir);
    let catalog = CatalogLoader::new(&config.data.dir).load()?;

    let image_client = if config.image_send.enabled {
        tracing::info!("Image forwarding enabled: {}", config.image_send.api_endpoint);
        Some(ImageSendClient::new(&config.image_send)?)
    } else {
        None
    };

    // Create application state
    let state = AppState {
        catalog: Arc::new(catalog),
        config: Arc::new(config.clone()),
        image_client,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Harvest Crop Planner API v1.0"
}
