//! Store Info API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Store info router
///
/// GET 公开 (前台展示 Paybill 号和配送费)；PUT 在 handler 内要求 ADMIN。
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/store-info", get(handler::get).put(handler::update))
}
