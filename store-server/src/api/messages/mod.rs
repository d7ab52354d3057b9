//! Customer Message API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Message router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/messages", routes())
}

fn routes() -> Router<ServerState> {
    // 前台：发送留言、按邮箱查看自己的会话
    // 后台：收件箱、会话详情、回复、标记已读
    Router::new()
        .route("/", post(handler::send).get(handler::my_thread))
        .route("/conversations", get(handler::list_conversations))
        .route("/conversations/{key}", get(handler::get_conversation))
        .route("/conversations/{key}/reply", post(handler::reply))
        .route("/conversations/{key}/read", post(handler::mark_read))
}
