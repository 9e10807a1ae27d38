use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};

/// Maximum accepted body size for API requests (1MB).
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the HTTP router.
///
/// API routes are matched first; every other path is served from the
/// configured static directory, so `GET /` returns the front-end page.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    let api_routes = Router::new()
        .route("/api/email-finder", post(handlers::email_finder))
        .route(
            "/api/verification-report",
            get(handlers::verification_report),
        )
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .fallback_service(static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
