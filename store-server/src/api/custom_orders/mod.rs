//! Custom Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Custom order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/custom-orders", routes())
}

fn routes() -> Router<ServerState> {
    // 前台提交；列表/详情/跟进是后台操作
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
}
