//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 判断 (method, path) 是否为公开商店路由
///
/// 商店前台（浏览商品、下单、留言、查单）无需登录；
/// 其余 `/api/` 路由全部要求 JWT。
fn is_public_route(method: &Method, path: &str) -> bool {
    if *method == Method::GET {
        return match path {
            // 商店展示信息 (Paybill 号、配送费、营业时间)
            "/api/health" | "/api/store-info" => true,
            // 商品目录：/api/cakes/all 是后台专用，其余 GET 公开
            "/api/cakes" => true,
            p if p.starts_with("/api/cakes/") && p != "/api/cakes/all" => true,
            // 优惠码校验（软失败，见 promo_codes handler）
            "/api/promo-codes/validate" => true,
            // 客户订单跟踪
            p if p.starts_with("/api/orders/track/") => true,
            // 客户查看自己的留言会话
            "/api/messages" => true,
            _ => false,
        };
    }

    if *method == Method::POST {
        // 登录、结账、报价、定制请求、客户留言
        return matches!(
            path,
            "/api/auth/login"
                | "/api/orders"
                | "/api/orders/quote"
                | "/api/custom-orders"
                | "/api/messages"
        );
    }

    false
}

/// 认证中间件 - 要求后台用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - 公开商店路由 (见 [`is_public_route`])
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 管理员中间件 - 要求 ADMIN 角色
///
/// 检查 `CurrentUser.role == "ADMIN"`，用于团队管理、商店设置等高权限路由。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/team-members", get(handler::list))
///     .layer(middleware::from_fn(require_admin));
/// ```
///
/// # 错误
///
/// 非管理员返回 403 Forbidden
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            username = user.username.clone()
        );
        return Err(AppError::admin_required());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_routes_are_public() {
        assert!(is_public_route(&Method::GET, "/api/cakes"));
        assert!(is_public_route(&Method::GET, "/api/cakes/cake:abc"));
        assert!(is_public_route(&Method::GET, "/api/promo-codes/validate"));
        assert!(is_public_route(&Method::POST, "/api/orders"));
        assert!(is_public_route(&Method::GET, "/api/orders/track/CK-1234"));
        assert!(is_public_route(&Method::POST, "/api/messages"));
    }

    #[test]
    fn back_office_routes_require_auth() {
        assert!(!is_public_route(&Method::GET, "/api/cakes/all"));
        assert!(!is_public_route(&Method::POST, "/api/cakes"));
        assert!(!is_public_route(&Method::GET, "/api/orders"));
        assert!(!is_public_route(&Method::PATCH, "/api/orders/order:abc"));
        assert!(!is_public_route(&Method::GET, "/api/statistics"));
        assert!(!is_public_route(&Method::PUT, "/api/store-info"));
        assert!(!is_public_route(&Method::GET, "/api/team-members"));
    }
}
