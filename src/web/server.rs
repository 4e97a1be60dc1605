//! Web server for noticeboard.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::auth::SessionStore;
use crate::config::WebConfig;
use crate::{Database, NoticeBoardError, Result};

use super::handlers::AppState;
use super::middleware::SessionState;
use super::router::{create_health_router, create_router};

/// Interval between expired-session sweeps.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 600;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Session state, present when login is enabled.
    session_state: Option<Arc<SessionState>>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &WebConfig, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                NoticeBoardError::Config(format!(
                    "invalid web server address {}:{}: {}",
                    config.host, config.port, e
                ))
            })?;

        let session_state = config
            .login_enabled
            .then(|| Arc::new(SessionState::from_config(config)));

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(db)),
            session_state,
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Check if the login routes are mounted.
    pub fn login_enabled(&self) -> bool {
        self.session_state.is_some()
    }

    /// Start the session cleanup background task.
    fn start_session_cleanup_task(store: Arc<dyn SessionStore>) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let removed = store.cleanup_expired();
                if removed == 0 {
                    tracing::debug!("No expired sessions to clean up");
                }
            }
        });
    }

    /// Build the full router and start background tasks.
    fn into_router(self) -> Router {
        if let Some(session_state) = &self.session_state {
            Self::start_session_cleanup_task(session_state.store.clone());
            tracing::info!("Session cleanup task started (runs every 10 minutes)");
        }

        create_router(self.app_state, self.session_state, &self.cors_origins)
            .merge(create_health_router())
            .layer(CompressionLayer::new())
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Server is running on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Server is running on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
