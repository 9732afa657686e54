//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::catalog::SearchEngine;
use crate::server::routes::{health_handler, list_categories_handler, search_resources_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub engine: Arc<SearchEngine>,
}

/// Build the Axum application router
///
/// `allowed_origins` empty means any origin may read the catalog.
pub fn build_app(engine: SearchEngine, allowed_origins: &[String]) -> Router {
    let app_state = AxumAppState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/resources", get(search_resources_handler))
        .route("/categories", get(list_categories_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins))
                .layer(Extension(app_state)),
        )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
