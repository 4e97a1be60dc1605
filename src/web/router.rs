//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    check_login, create_notice, delete_notice, list_notices, login, logout, update_notice,
    AppState,
};
use super::middleware::{create_cors_layer, session_layer, SessionState};

/// Create the main API router.
///
/// Login routes and the session layer are only installed when
/// `session_state` is given.
pub fn create_router(
    app_state: Arc<AppState>,
    session_state: Option<Arc<SessionState>>,
    cors_origins: &[String],
) -> Router {
    // Notice board routes
    let mut api_routes = Router::new()
        .route("/data", get(list_notices).post(create_notice))
        .route("/data/:post_no", put(update_notice).delete(delete_notice));

    if let Some(session_state) = session_state {
        api_routes = api_routes
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/check-login", get(check_login))
            .layer(middleware::from_fn_with_state(session_state, session_layer));
    }

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
