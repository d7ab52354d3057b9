//! Core Module
//!
//! 配置、状态和 HTTP 服务器：
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 服务单例容器
//! - [`Server`] - HTTP 服务器

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
