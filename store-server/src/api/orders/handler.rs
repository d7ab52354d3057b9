//! Order API Handlers
//!
//! 下单逻辑在 [`CheckoutService`](crate::services::CheckoutService)；
//! 这里只做 HTTP 编解码和后台查询。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, OrderUpdate, PaymentStatus};
use crate::db::repository::OrderRepository;
use crate::services::{CheckoutRequest, CheckoutResponse, QuoteRequest, QuoteResponse};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

fn default_limit() -> i64 {
    50
}

/// Paginated order list
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// 客户订单跟踪视图 (只暴露状态和金额，不含后台备注)
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub total: f64,
    pub delivery_date: String,
    pub delivery_time: String,
    pub created_at: i64,
}

/// POST /api/orders - 结账下单 (商店前台)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let response = state.checkout.checkout(payload).await?;
    Ok(Json(response))
}

/// POST /api/orders/quote - 购物车报价 (商店前台)
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<QuoteResponse>> {
    let response = state.checkout.quote(payload).await?;
    Ok(Json(response))
}

/// GET /api/orders/track/:order_number - 客户订单跟踪
pub async fn track(
    State(state): State<ServerState>,
    Path(order_number): Path<String>,
) -> AppResult<Json<TrackResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_order_number(&order_number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", order_number)))?;

    Ok(Json(TrackResponse {
        order_number: order.order_number,
        status: order.status,
        payment_status: order.payment_status,
        subtotal: order.subtotal,
        delivery_fee: order.delivery_fee,
        discount: order.discount,
        total: order.total,
        delivery_date: order.delivery_date,
        delivery_time: order.delivery_time,
        created_at: order.created_at,
    }))
}

/// GET /api/orders - 订单列表 (后台，分页 + 状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<OrderListResponse>> {
    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_all(limit, offset, query.status, query.payment_status)
        .await?;
    let total = repo.count(query.status, query.payment_status).await?;

    Ok(Json(OrderListResponse {
        orders,
        total,
        limit,
        offset,
    }))
}

/// GET /api/orders/:id - 订单详情 (后台)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}

/// PATCH /api/orders/:id - 后台修改订单状态
///
/// 仅 status / payment_status / payment_reference / admin_notes 可变，
/// 金额和行项目在下单后不可变。状态是固定枚举重赋值，无状态机约束。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    validate_optional_text(&payload.payment_reference, "payment_reference", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.admin_notes, "admin_notes", MAX_NOTE_LEN)?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update(&id, payload).await?;

    tracing::info!(
        order_number = %order.order_number,
        status = ?order.status,
        payment_status = ?order.payment_status,
        "Order updated"
    );

    Ok(Json(order))
}
