//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod cake;
pub mod custom_order;
pub mod message;
pub mod order;
pub mod promo_code;
pub mod store_info;
pub mod team_member;

// Re-exports
pub use cake::CakeRepository;
pub use custom_order::CustomOrderRepository;
pub use message::MessageRepository;
pub use order::OrderRepository;
pub use promo_code::PromoCodeRepository;
pub use store_info::StoreInfoRepository;
pub use team_member::TeamMemberRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "cake:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("cake", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// 解析 "table:id" 字符串为 RecordId，并校验表名
    pub fn parse_id(&self, table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
        let record: surrealdb::RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if record.table() != table {
            return Err(RepoError::Validation(format!(
                "Invalid ID: expected {} record, got {}",
                table, id
            )));
        }
        Ok(record)
    }
}
