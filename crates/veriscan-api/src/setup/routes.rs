//! Route configuration and setup.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use veriscan_core::Config;

/// Setup all application routes.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        .route("/detect", post(handlers::detect::detect))
        .route("/history", get(handlers::history::history))
        .route("/result/{id}", get(handlers::history::result_by_id))
        .route("/health", get(handlers::health::health))
        .route(
            "/health/db",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async { handlers::health::db_health(state).await }
                }
            }),
        );

    // The body limit sits above the validator ceiling; oversize uploads get
    // the validator's 400 with a size message, not a framework 413.
    let body_limit = config.max_upload_size_bytes * 2;

    let app = Router::new()
        .route("/", get(handlers::health::root))
        .nest(&config.api_prefix, api_routes)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
