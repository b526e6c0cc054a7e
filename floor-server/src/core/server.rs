//! HTTP 服务器
//!
//! 组装路由、中间件与状态，并处理优雅关闭。

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::require_auth;
use crate::core::{Config, ServerState};

/// HTTP 服务器
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Build a fully configured application with all middleware and state
    pub fn build_app(state: &ServerState) -> Router {
        api::build_router()
            // CORS - Handle cross-origin requests
            .layer(CorsLayer::permissive())
            // Trace - Request tracing (logs at INFO level)
            .layer(TraceLayer::new_for_http())
            // JWT authentication - injects CurrentUser before routes
            .layer(axum_middleware::from_fn_with_state(
                state.clone(),
                require_auth,
            ))
            .with_state(state.clone())
    }

    /// 启动 HTTP 服务并阻塞到收到关闭信号
    pub async fn run(self) -> anyhow::Result<()> {
        let app = Self::build_app(&self.state);

        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("HTTP server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
