//! Promo Code Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Promo code ID type
pub type PromoCodeId = RecordId;

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoType {
    /// 按小计百分比折扣 (discount = 百分点)
    Percentage,
    /// 固定金额折扣 (discount = KSh)
    Fixed,
}

/// Promo code entity (优惠码)
///
/// `code` 存储为大写，匹配时对输入归一化实现大小写无关。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PromoCodeId>,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub promo_type: PromoType,
    /// 折扣值 (percentage: 10 = 10%, fixed: 500 = KSh 500)
    pub discount: f64,
    /// 小计下限，低于此值不可用
    #[serde(default)]
    pub min_order: Option<f64>,
    /// 折扣金额上限 (仅 percentage 类型有意义)
    #[serde(default)]
    pub max_discount: Option<f64>,
    /// 生效时间 (Unix millis)，None = 立即生效
    #[serde(default)]
    pub valid_from: Option<i64>,
    /// 失效时间 (Unix millis)，None = 永不过期
    #[serde(default)]
    pub valid_until: Option<i64>,
    /// 可用次数上限，None = 不限
    #[serde(default)]
    pub usage_limit: Option<i64>,
    /// 已成功下单次数 (单调递增，由条件更新维护)
    #[serde(default)]
    pub usage_count: i64,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create promo code payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCodeCreate {
    pub code: String,
    pub description: Option<String>,
    pub promo_type: PromoType,
    pub discount: f64,
    pub min_order: Option<f64>,
    pub max_discount: Option<f64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub usage_limit: Option<i64>,
}

/// Update promo code payload
///
/// `usage_count` 不可通过此结构修改，只能由下单路径的条件更新递增。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_type: Option<PromoType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
