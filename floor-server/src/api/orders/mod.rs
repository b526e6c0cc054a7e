//! Orders API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::edit))
        .route("/{id}/status", post(handler::advance_status))
        .route("/{id}/payment", post(handler::confirm_payment))
        .route("/{id}/split-payment", post(handler::confirm_split_payment))
}
