//! Store Info Repository
//!
//! 固定记录 ID (store_info:main) 的单例表。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{StoreInfo, StoreInfoUpdate};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "store_info";
const SINGLETON_KEY: &str = "main";

#[derive(Clone)]
pub struct StoreInfoRepository {
    base: BaseRepository,
}

impl StoreInfoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn singleton_id() -> RecordId {
        RecordId::from_table_key(TABLE, SINGLETON_KEY)
    }

    /// Get the store settings singleton
    pub async fn get(&self) -> RepoResult<Option<StoreInfo>> {
        let info: Option<StoreInfo> = self.base.db().select(Self::singleton_id()).await?;
        Ok(info)
    }

    /// First-boot seed
    pub async fn seed(&self, mut info: StoreInfo) -> RepoResult<StoreInfo> {
        info.id = None;
        info.updated_at = shared::now_millis();
        let created: Option<StoreInfo> = self
            .base
            .db()
            .create(Self::singleton_id())
            .content(info)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to seed store info".to_string()))
    }

    /// Admin update
    pub async fn update(&self, data: StoreInfoUpdate) -> RepoResult<StoreInfo> {
        let mut patch = serde_json::to_value(&data).map_err(|e| RepoError::Database(e.to_string()))?;
        if let Some(obj) = patch.as_object_mut() {
            obj.insert("updated_at".into(), serde_json::json!(shared::now_millis()));
        }

        self.base
            .db()
            .query("UPDATE $info MERGE $data")
            .bind(("info", Self::singleton_id()))
            .bind(("data", patch))
            .await?;

        self.get()
            .await?
            .ok_or_else(|| RepoError::NotFound("Store info not found".to_string()))
    }
}
