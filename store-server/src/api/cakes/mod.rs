//! Cake Catalog API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Cake router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cakes", routes())
}

fn routes() -> Router<ServerState> {
    // 商店前台：GET 公开（认证在全局中间件按路径豁免）
    // 后台：/all 和所有写操作要求登录
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/all", get(handler::list_all))
        .route("/categories", get(handler::list_categories))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
