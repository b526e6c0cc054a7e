//! Health API 模块

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: i64,
}

/// GET /api/health - 健康检查（公开路由）
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db.pool)
        .await
    {
        Ok(_) => "up",
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            "down"
        }
    };

    Ok(Json(HealthResponse {
        status: if database == "up" { "ok" } else { "degraded" },
        database,
        timestamp: shared::util::now_millis(),
    }))
}
