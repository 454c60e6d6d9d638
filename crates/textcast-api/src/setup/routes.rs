//! Route configuration and setup

use crate::constants::{
    DELETE_PATH, DELETE_SUBUPLOAD_PATH, HEALTH_PATH, LIST_EXTENDED_PATH, LIST_TEXTS_PATH,
    OPENAPI_PATH, UPLOAD_EXTENDED_PATH, UPLOAD_PATH,
};
use crate::handlers;
use crate::middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use textcast_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_upload_size_bytes();

    let app = Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(upload_routes())
        .merge(record_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::redact_sensitive_errors,
        ))
        // Multipart bodies are checked against the same limit as the whole request
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(UPLOAD_PATH, post(handlers::upload::upload))
        .route(
            UPLOAD_EXTENDED_PATH,
            post(handlers::upload_extended::upload_extended),
        )
}

fn record_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(LIST_TEXTS_PATH, get(handlers::list::list_texts))
        .route(LIST_EXTENDED_PATH, get(handlers::list::list_extended_uploads))
        .route(DELETE_PATH, post(handlers::delete::delete_upload))
        .route(
            DELETE_SUBUPLOAD_PATH,
            post(handlers::delete::delete_subupload),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
