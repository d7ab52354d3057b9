//! Order Model
//!
//! 订单创建后不可变，只有 status / payment_status / payment_reference /
//! admin_notes 可由后台修改。金额均为下单时快照，目录改价不影响历史订单。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order ID type
pub type OrderId = RecordId;

/// 订单状态 (固定枚举重赋值，无状态机约束)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

/// 支付状态 (人工 Paybill 对账后由后台标记)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

/// 订单行 (嵌入订单文档，价格为下单时快照)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// 蛋糕记录 ID ("cake:xxx")
    pub cake_id: String,
    /// 蛋糕名称快照
    pub cake_name: String,
    pub selected_size: String,
    pub selected_flavor: String,
    pub selected_layer: String,
    pub quantity: i64,
    /// 单价 (base + size + layer)
    pub unit_price: f64,
    /// 批量折扣后的单价 (整数 KSh，半进位取整)
    pub discounted_unit_price: f64,
    /// discounted_unit_price * quantity
    pub line_total: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// 人类可读订单号，同时用作 Paybill account reference
    pub order_number: String,

    // ── 客户与配送信息 ──
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub address_line: String,
    pub city: String,
    #[serde(default)]
    pub notes: String,
    /// 配送日期 (YYYY-MM-DD)
    pub delivery_date: String,
    /// 配送时段，如 "10:00 - 12:00"
    pub delivery_time: String,

    // ── 金额 ──
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    /// subtotal + delivery_fee - discount
    pub total: f64,
    #[serde(default)]
    pub promo_code: Option<String>,

    // ── 状态 ──
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// 固定为 "MPESA_PAYBILL" (人工对账流程)
    pub payment_method: String,
    /// 人工对账时录入的 M-Pesa 回执号
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub admin_notes: String,

    pub created_at: i64,
    pub updated_at: i64,
}

/// 后台订单修改 payload (仅状态类字段)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl OrderStatus {
    /// 是否计入营收统计 (取消订单不计)
    pub fn counts_for_revenue(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }
}
