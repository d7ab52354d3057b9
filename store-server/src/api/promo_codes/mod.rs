//! Promo Code API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Promo code router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/promo-codes", routes())
}

fn routes() -> Router<ServerState> {
    // /validate 是商店前台的软校验端点，其余为后台 CRUD
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/validate", get(handler::validate))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
