//! Store Info Model
//!
//! 商店设置单例：Paybill 收款号、配送费、营业信息。
//! 首次启动时写入默认值，后台可修改。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Store info ID type
pub type StoreInfoId = RecordId;

/// Store settings singleton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<StoreInfoId>,
    pub store_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// M-Pesa Paybill 商户号 (结账页展示，人工对账)
    pub paybill_number: String,
    /// 配送费 (KSh)
    pub delivery_fee: f64,
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default)]
    pub updated_at: i64,
}

impl StoreInfo {
    /// 首次启动的默认设置
    pub fn default_settings() -> Self {
        Self {
            id: None,
            store_name: "Velvet Crumb Cakes".to_string(),
            tagline: "Freshly baked, made to order".to_string(),
            phone: "+254 700 000000".to_string(),
            email: "hello@velvetcrumb.co.ke".to_string(),
            paybill_number: "000000".to_string(),
            delivery_fee: 500.0,
            opening_hours: "Mon-Sat 8:00 - 18:00".to_string(),
            updated_at: 0,
        }
    }
}

/// Update store settings payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paybill_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}
