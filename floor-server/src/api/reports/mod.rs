//! Reports API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/daily-summary", get(handler::daily_summary))
        .route("/daily-revenue", get(handler::daily_revenue))
}
