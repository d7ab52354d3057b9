//! Cake Store Server - 在线蛋糕商店与后台管理服务
//!
//! # 架构概述
//!
//! 本模块是商店后端的主入口，提供以下核心功能：
//!
//! - **目录** (`api/cakes`): 蛋糕目录浏览与后台维护
//! - **定价引擎** (`pricing`): 单价解析、批量折扣、优惠码校验
//! - **下单** (`services/checkout`): 服务端权威重算 + Paybill 付款指引
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 后台认证
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色检查
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 下单编排
//! ├── pricing/       # 定价与优惠引擎
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod pricing;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::CheckoutService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      __           _____ __
  / ____/___ _/ /_____     / ___// /_____  ________
 / /   / __ `/ //_/ _ \    \__ \/ __/ __ \/ ___/ _ \
/ /___/ /_/ / ,< /  __/   ___/ / /_/ /_/ / /  /  __/
\____/\__,_/_/|_|\___/   /____/\__/\____/_/   \___/
    "#
    );
}
