//! Custom Order Request Model
//!
//! 商店前台的定制蛋糕请求：客户描述需求，后台跟进报价。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Custom order request ID type
pub type CustomOrderId = RecordId;

/// 定制请求状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomOrderStatus {
    New,
    Reviewed,
    Quoted,
    Closed,
}

/// Custom order request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomOrderRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CustomOrderId>,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// 场合，如 "Wedding" / "Birthday"
    #[serde(default)]
    pub occasion: String,
    /// 宾客人数
    #[serde(default)]
    pub serves: Option<i64>,
    #[serde(default)]
    pub flavor_notes: String,
    #[serde(default)]
    pub design_notes: String,
    /// 客户预算 (KSh)
    #[serde(default)]
    pub budget: Option<f64>,
    /// 活动日期 (YYYY-MM-DD)
    pub event_date: String,
    /// 参考图 URL
    #[serde(default)]
    pub reference_image: Option<String>,
    pub status: CustomOrderStatus,
    /// 后台报价 (KSh)
    #[serde(default)]
    pub quoted_price: Option<f64>,
    #[serde(default)]
    pub admin_notes: String,
    pub created_at: i64,
}

/// Create custom order request payload (storefront)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomOrderCreate {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub occasion: Option<String>,
    pub serves: Option<i64>,
    pub flavor_notes: Option<String>,
    pub design_notes: Option<String>,
    pub budget: Option<f64>,
    pub event_date: String,
    pub reference_image: Option<String>,
}

/// Update custom order request payload (back office)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomOrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomOrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}
