//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 前台：结账、报价、订单跟踪；后台：列表、详情、状态修改
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/quote", post(handler::quote))
        .route("/track/{order_number}", get(handler::track))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
}
