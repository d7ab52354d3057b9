//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResult`] - handler 返回类型别名
//!
//! 错误码取值见 [`shared::error::ErrorCode`]，HTTP 状态码由错误码映射得出。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Cake cake:abc"))
//!
//! // 返回成功响应
//! Ok(Json(data))
//! ```

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use shared::error::{ApiResponse, ErrorCode};
use tracing::error;

use crate::db::repository::RepoError;

/// 应用错误枚举
///
/// # 错误分类
///
/// | 分类 | 说明 |
/// |------|------|
/// | 认证错误 | 未登录、令牌过期、无效令牌 |
/// | 业务逻辑错误 | 资源不存在、验证失败、库存/优惠码规则 |
/// | 系统错误 | 数据库错误、内部错误、无效请求 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (4xx) ==========
    #[error("Authentication required")]
    /// 未登录 (401)
    Unauthorized,

    #[error("Token expired")]
    /// 令牌过期 (401)
    TokenExpired,

    #[error("Invalid token: {0}")]
    /// 无效令牌 (401)
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    #[error("Admin role required")]
    /// 需要管理员角色 (403)
    AdminRequired,

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("{message}")]
    /// 携带具体错误码的业务错误 (状态码由错误码映射)
    Business { code: ErrorCode, message: String },

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),

    #[error("Invalid request: {0}")]
    /// 无效请求 (400)
    Invalid(String),
}

impl AppError {
    // ==================== Convenience constructors ====================

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn admin_required() -> Self {
        Self::AdminRequired
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// 业务错误：携带具体错误码，客户端可据此分支处理
    pub fn business(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
        }
    }

    /// 此错误对应的统一错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::TokenExpired => ErrorCode::TokenExpired,
            Self::InvalidToken(_) => ErrorCode::TokenInvalid,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::AdminRequired => ErrorCode::AdminRequired,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Conflict(_) => ErrorCode::AlreadyExists,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Business { code, .. } => *code,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Internal(_) => ErrorCode::InternalError,
            Self::Invalid(_) => ErrorCode::InvalidRequest,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        // 5xx 细节只进日志，客户端拿到通用消息
        let message = match &self {
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                ErrorCode::DatabaseError.message().to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                ErrorCode::InternalError.message().to_string()
            }
            other => other.to_string(),
        };

        let body = ApiResponse::<()>::error(code, message);
        (code.http_status(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn error_codes_map_to_http_status() {
        assert_eq!(
            AppError::unauthorized().code().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::not_found("x").code().http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("x").code().http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::business(ErrorCode::InsufficientStock, "x")
                .code()
                .http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::database("x").code().http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repo_error_conversion() {
        let err: AppError = RepoError::Duplicate("promo 'SAVE10'".to_string()).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
