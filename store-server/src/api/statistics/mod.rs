//! Statistics API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Statistics router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/statistics", get(handler::get_statistics))
}
