mod assets;
mod pages;
mod partials;

pub use partials::{dashboard_widget_fragment, esi_status_fragment};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use esistatus_core::EsiStatusConfig;

use crate::store::StatusStore;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: StatusStore,
    pub config: Arc<EsiStatusConfig>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the Axum router.
pub fn create_router(state: AppState) -> Router {
    let cors = if state.config.server.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health_handler))
        // AJAX fragment endpoints, polled by the browser widget
        .route("/-/ajax/esi-status", get(partials::ajax_esi_status))
        .route(
            "/-/ajax/dashboard-widget",
            get(partials::ajax_dashboard_widget),
        )
        // Static assets
        .route("/assets/styles.css", get(assets::styles_css))
        .route("/assets/esistatus.js", get(assets::widget_js));

    // Built wasm bundle, when a dist directory is configured
    if let Some(dist) = &state.config.server.widget_dist_dir {
        router = router.nest_service("/assets/widget", ServeDir::new(dist));
    }

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(cors)
            .layer(TraceLayer::new_for_http()),
    )
}

/// Socket address for the configured port.
pub fn server_addr(config: &EsiStatusConfig) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], config.server.port))
}

/// Health check handler.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
