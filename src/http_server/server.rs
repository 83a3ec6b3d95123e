//! HTTP server wiring
//!
//! Combines the store routes with a health endpoint and CORS, and runs the
//! axum serve loop.

use std::io;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::store_routes::{handle_health, store_routes, ApiState};

/// HTTP server exposing one store
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given state with custom configuration
    pub fn with_config(config: HttpServerConfig, state: Arc<ApiState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router
    fn build_router(config: &HttpServerConfig, state: Arc<ApiState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            // no origins configured: permissive, for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(handle_health))
            .merge(store_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// The router, for in-process testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until the process exits
    pub async fn run(self) -> io::Result<()> {
        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!(%addr, "http server listening");
        axum::serve(listener, self.router).await
    }
}
