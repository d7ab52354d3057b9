//! 商店前后台共享类型
//!
//! 前台商店 API 和后台管理 API 共用的基础类型：
//!
//! - [`error`] - 统一错误码和 API 响应结构
//! - [`client`] - 认证相关 DTO
//! - [`util`] - 时间戳和 ID 生成工具

pub mod client;
pub mod error;
pub mod util;

pub use error::{ApiResponse, ErrorCategory, ErrorCode};
pub use util::{now_millis, order_number, snowflake_id};
