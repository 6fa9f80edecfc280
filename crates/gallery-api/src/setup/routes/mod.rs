//! Route configuration and setup.
//!
//! Gallery pages and their form/JSON endpoints live in [gallery_routes];
//! health and the OpenAPI document in [public_routes].

pub(crate) mod health;

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use gallery_core::Config;
use gallery_infra::{request_id_middleware, security_headers_middleware, SecurityHeaders};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file bytes.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let body_limit = config
        .max_total_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let static_dir = config.static_dir();
    if !static_dir.is_dir() {
        tracing::warn!(
            static_dir = %static_dir.display(),
            "Static directory not found, /static will return 404"
        );
    }

    let app = gallery_routes()
        .merge(public_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders::new(state.is_production),
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
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
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn gallery_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::gallery::show_gallery))
        .route(
            "/upload",
            get(handlers::gallery::upload_form).post(handlers::upload::upload_media),
        )
        .route("/delete", post(handlers::delete::delete_media))
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
