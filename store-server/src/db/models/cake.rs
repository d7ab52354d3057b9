//! Cake Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Cake ID type
pub type CakeId = RecordId;

/// 尺寸选项 (在 base_price 之上的加价)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CakeSize {
    pub name: String,
    /// 加价 (KSh)
    pub price: f64,
    /// 可供几人食用，例如 "8-10"
    #[serde(default)]
    pub serves: String,
}

/// 层数选项 (在 base_price 之上的加价)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CakeLayer {
    pub name: String,
    /// 加价 (KSh)
    pub price: f64,
}

/// Cake model matching the catalog table
///
/// 单价不变式: `base_price + size.price + layer.price`，口味不加价。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cake {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CakeId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 图片 URL (外部存储，本服务只存字符串)
    #[serde(default)]
    pub image: String,
    /// 分类标签，如 "Birthday" / "Wedding"
    #[serde(default)]
    pub category: String,
    /// 基础价 (KSh)
    pub base_price: f64,
    #[serde(default)]
    pub sizes: Vec<CakeSize>,
    #[serde(default)]
    pub flavors: Vec<String>,
    #[serde(default)]
    pub layers: Vec<CakeLayer>,
    /// 剩余库存，None = 不限量
    #[serde(default)]
    pub stock: Option<i64>,
    /// 是否有货 (下架开关，独立于 stock 计数)
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub in_stock: bool,
    /// 是否在商店前台可见
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_visible: bool,
    #[serde(default)]
    pub sort_order: i32,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Cake {
    /// 是否可购买 (前台可见且有货)
    pub fn is_purchasable(&self) -> bool {
        self.is_visible && self.in_stock
    }

    /// 按名称查找尺寸选项
    pub fn find_size(&self, name: &str) -> Option<&CakeSize> {
        self.sizes.iter().find(|s| s.name == name)
    }

    /// 按名称查找层数选项
    pub fn find_layer(&self, name: &str) -> Option<&CakeLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// 口味是否在配置列表中
    pub fn has_flavor(&self, name: &str) -> bool {
        self.flavors.iter().any(|f| f == name)
    }
}

/// Create cake payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CakeCreate {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub base_price: f64,
    pub sizes: Option<Vec<CakeSize>>,
    pub flavors: Option<Vec<String>>,
    pub layers: Option<Vec<CakeLayer>>,
    pub stock: Option<i64>,
    pub sort_order: Option<i32>,
}

/// Update cake payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CakeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<CakeSize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<CakeLayer>>,
    /// 双层 Option：外层 None = 不变，内层 None = 改为不限量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}
