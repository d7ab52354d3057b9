//! Promo Code Repository
//!
//! `code` 永远以大写形式入库；所有查找先归一化输入，
//! 实现大小写无关匹配 ("save10" == "SAVE10")。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{PromoCode, PromoCodeCreate, PromoCodeUpdate};
use crate::utils::validation::normalize_promo_code;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "promo_code";

#[derive(Clone)]
pub struct PromoCodeRepository {
    base: BaseRepository,
}

impl PromoCodeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all promo codes (back office, newest first)
    pub async fn find_all(&self) -> RepoResult<Vec<PromoCode>> {
        let promos: Vec<PromoCode> = self
            .base
            .db()
            .query("SELECT * FROM promo_code ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(promos)
    }

    /// Find promo by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PromoCode>> {
        let record = self.base.parse_id(TABLE, id)?;
        let promo: Option<PromoCode> = self.base.db().select(record).await?;
        Ok(promo)
    }

    /// Find promo by code (case-insensitive)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<PromoCode>> {
        let normalized = normalize_promo_code(code);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM promo_code WHERE code = $code LIMIT 1")
            .bind(("code", normalized))
            .await?;
        let promos: Vec<PromoCode> = result.take(0)?;
        Ok(promos.into_iter().next())
    }

    /// Create a new promo code
    pub async fn create(&self, data: PromoCodeCreate) -> RepoResult<PromoCode> {
        let code = normalize_promo_code(&data.code);

        // Check duplicate code
        if self.find_by_code(&code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Promo code '{}' already exists",
                code
            )));
        }

        let promo = PromoCode {
            id: None,
            code,
            description: data.description.unwrap_or_default(),
            promo_type: data.promo_type,
            discount: data.discount,
            min_order: data.min_order,
            max_discount: data.max_discount,
            valid_from: data.valid_from,
            valid_until: data.valid_until,
            usage_limit: data.usage_limit,
            usage_count: 0,
            is_active: true,
            created_at: shared::now_millis(),
        };

        let created: Option<PromoCode> = self.base.db().create(TABLE).content(promo).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create promo code".to_string()))
    }

    /// Update a promo code
    pub async fn update(&self, id: &str, data: PromoCodeUpdate) -> RepoResult<PromoCode> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Promo code {} not found", id)))?;

        self.base
            .db()
            .query("UPDATE $promo MERGE $data")
            .bind(("promo", record))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Promo code {} not found", id)))
    }

    /// Delete a promo code
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        let deleted: Option<PromoCode> = self.base.db().delete(record).await?;
        Ok(deleted.is_some())
    }

    /// 原子认领一次使用额度
    ///
    /// 限额检查和计数递增在同一条条件 UPDATE 里完成，
    /// 两个并发结账不可能同时用掉最后一个名额。
    /// 返回 `true` 表示认领成功。
    pub async fn try_claim_usage(&self, code: &str) -> RepoResult<bool> {
        let normalized = normalize_promo_code(code);
        let mut result = self
            .base
            .db()
            .query(
                r#"
                UPDATE promo_code SET usage_count += 1
                WHERE code = $code AND is_active = true
                  AND (usage_limit = NONE OR usage_count < usage_limit)
                RETURN AFTER
                "#,
            )
            .bind(("code", normalized))
            .await?;
        let updated: Vec<PromoCode> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// 释放一次已认领的额度 (订单写入失败时的补偿)
    pub async fn release_usage(&self, code: &str) -> RepoResult<()> {
        let normalized = normalize_promo_code(code);
        self.base
            .db()
            .query("UPDATE promo_code SET usage_count -= 1 WHERE code = $code AND usage_count > 0")
            .bind(("code", normalized))
            .await?;
        Ok(())
    }
}
