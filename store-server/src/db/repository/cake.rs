//! Cake Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cake, CakeCreate, CakeUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cake";

#[derive(Clone)]
pub struct CakeRepository {
    base: BaseRepository,
}

impl CakeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all cakes visible on the storefront
    pub async fn find_visible(&self) -> RepoResult<Vec<Cake>> {
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query("SELECT * FROM cake WHERE is_visible = true ORDER BY sort_order, name")
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// Find visible cakes in a category
    pub async fn find_by_category(&self, category: &str) -> RepoResult<Vec<Cake>> {
        let category_owned = category.to_string();
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query("SELECT * FROM cake WHERE is_visible = true AND category = $category ORDER BY sort_order, name")
            .bind(("category", category_owned))
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// Find all cakes including hidden (back office)
    pub async fn find_all(&self) -> RepoResult<Vec<Cake>> {
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query("SELECT * FROM cake ORDER BY sort_order, name")
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// Distinct category names of visible cakes
    pub async fn list_categories(&self) -> RepoResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct Row {
            category: String,
        }
        let rows: Vec<Row> = self
            .base
            .db()
            .query("SELECT category FROM cake WHERE is_visible = true AND category != '' GROUP BY category")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.category).collect())
    }

    /// Find cake by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Cake>> {
        let record = self.base.parse_id(TABLE, id)?;
        let cake: Option<Cake> = self.base.db().select(record).await?;
        Ok(cake)
    }

    /// Find cake by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Cake>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cake WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let cakes: Vec<Cake> = result.take(0)?;
        Ok(cakes.into_iter().next())
    }

    /// Create a new cake
    pub async fn create(&self, data: CakeCreate) -> RepoResult<Cake> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Cake '{}' already exists",
                data.name
            )));
        }

        let cake = Cake {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            image: data.image.unwrap_or_default(),
            category: data.category.unwrap_or_default(),
            base_price: data.base_price,
            sizes: data.sizes.unwrap_or_default(),
            flavors: data.flavors.unwrap_or_default(),
            layers: data.layers.unwrap_or_default(),
            stock: data.stock,
            in_stock: data.stock.is_none_or(|s| s > 0),
            is_visible: true,
            sort_order: data.sort_order.unwrap_or(0),
            created_at: shared::now_millis(),
        };

        let created: Option<Cake> = self.base.db().create(TABLE).content(cake).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cake".to_string()))
    }

    /// Update a cake
    pub async fn update(&self, id: &str, data: CakeUpdate) -> RepoResult<Cake> {
        let record = self.base.parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cake {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Cake '{}' already exists",
                new_name
            )));
        }

        self.base
            .db()
            .query("UPDATE $cake MERGE $data")
            .bind(("cake", record))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cake {} not found", id)))
    }

    /// Delete a cake
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        let deleted: Option<Cake> = self.base.db().delete(record).await?;
        Ok(deleted.is_some())
    }

    /// 条件扣减库存
    ///
    /// 返回 `true` 表示扣减成功（或该蛋糕不限量）；`false` 表示库存不足。
    /// 条件写在 WHERE 里，两个并发订单不会把同一份库存扣两次。
    /// 扣到 0 时同步翻转 in_stock。
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;

        let cake = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cake {} not found", id)))?;
        if cake.stock.is_none() {
            return Ok(true); // 不限量
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"
                UPDATE $cake SET stock -= $qty WHERE stock != NONE AND stock >= $qty RETURN AFTER;
                UPDATE $cake SET in_stock = false WHERE stock != NONE AND stock <= 0;
                "#,
            )
            .bind(("cake", record))
            .bind(("qty", quantity))
            .await?;
        let updated: Vec<Cake> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// 回补库存 (订单写入失败时的补偿)
    pub async fn restore_stock(&self, id: &str, quantity: i64) -> RepoResult<()> {
        let record = self.base.parse_id(TABLE, id)?;
        self.base
            .db()
            .query(
                r#"
                UPDATE $cake SET stock += $qty, in_stock = true WHERE stock != NONE;
                "#,
            )
            .bind(("cake", record))
            .bind(("qty", quantity))
            .await?;
        Ok(())
    }
}
