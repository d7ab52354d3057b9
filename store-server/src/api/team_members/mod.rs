//! Team Member API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Team member router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/team-members", routes())
}

fn routes() -> Router<ServerState> {
    // 团队管理整个模块仅 ADMIN 可用
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin))
}
