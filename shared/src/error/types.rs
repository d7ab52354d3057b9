//! API response envelope

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// API 统一响应结构
///
/// ```json
/// {
///   "code": 0,
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 错误码 (0 表示成功)
    pub code: u16,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success.value(),
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
        }
    }

    /// 创建错误响应
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.value(),
            message: message.into(),
            data: None,
        }
    }

    /// 响应是否成功
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.value()
    }
}
