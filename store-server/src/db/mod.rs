//! Database Module
//!
//! 嵌入式 SurrealDB (RocksDB 后端)。启动时定义索引并写入种子数据：
//! 默认管理员账号和商店设置单例。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;
use models::{StaffRole, StoreInfo, TeamMember};
use repository::{StoreInfoRepository, TeamMemberRepository};

/// 数据库命名空间/库名
const NS: &str = "cakestore";
const DB: &str = "store";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `db_path` and prepare it
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NS)
            .use_db(DB)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB/RocksDB at {db_path})");

        let service = Self { db };
        service.define_schema().await?;
        service.seed_defaults().await?;

        Ok(service)
    }

    /// 定义唯一索引 (幂等，DEFINE ... IF NOT EXISTS)
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                r#"
                DEFINE INDEX IF NOT EXISTS unique_promo_code ON promo_code FIELDS code UNIQUE;
                DEFINE INDEX IF NOT EXISTS unique_team_username ON team_member FIELDS username UNIQUE;
                DEFINE INDEX IF NOT EXISTS unique_order_number ON order FIELDS order_number UNIQUE;
                DEFINE INDEX IF NOT EXISTS order_created_at ON order FIELDS created_at;
                DEFINE INDEX IF NOT EXISTS message_conversation ON message FIELDS conversation_key;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        tracing::info!("Database schema applied");
        Ok(())
    }

    /// 种子数据：默认管理员 + 商店设置单例
    ///
    /// 默认管理员密码从 ADMIN_INITIAL_PASSWORD 读取，未设置时使用
    /// "changeme" 并打印警告。只在首次启动 (空表) 时写入。
    async fn seed_defaults(&self) -> Result<(), AppError> {
        let team_repo = TeamMemberRepository::new(self.db.clone());
        if team_repo.count().await.map_err(AppError::from)? == 0 {
            let password = std::env::var("ADMIN_INITIAL_PASSWORD").unwrap_or_else(|_| {
                tracing::warn!(
                    "⚠️  ADMIN_INITIAL_PASSWORD not set, seeding admin with default password"
                );
                "changeme".to_string()
            });
            let hash_pass = TeamMember::hash_password(&password)
                .map_err(|e| AppError::internal(format!("Failed to hash seed password: {e}")))?;
            team_repo
                .create_system_admin("admin", "Administrator", &hash_pass, StaffRole::Admin)
                .await?;
            tracing::info!("Seeded system admin account 'admin'");
        }

        let store_repo = StoreInfoRepository::new(self.db.clone());
        if store_repo.get().await.map_err(AppError::from)?.is_none() {
            store_repo.seed(StoreInfo::default_settings()).await?;
            tracing::info!("Seeded default store settings");
        }

        Ok(())
    }
}
