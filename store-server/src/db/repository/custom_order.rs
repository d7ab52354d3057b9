//! Custom Order Request Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CustomOrderCreate, CustomOrderRequest, CustomOrderStatus, CustomOrderUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "custom_order";

#[derive(Clone)]
pub struct CustomOrderRepository {
    base: BaseRepository,
}

impl CustomOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List requests (newest first, optional status filter)
    pub async fn find_all(&self, status: Option<CustomOrderStatus>) -> RepoResult<Vec<CustomOrderRequest>> {
        let requests: Vec<CustomOrderRequest> = self
            .base
            .db()
            .query(
                r#"
                SELECT * FROM custom_order
                WHERE ($status = NONE OR status = $status)
                ORDER BY created_at DESC
                "#,
            )
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Find request by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomOrderRequest>> {
        let record = self.base.parse_id(TABLE, id)?;
        let request: Option<CustomOrderRequest> = self.base.db().select(record).await?;
        Ok(request)
    }

    /// Requests created in `[start, end)` (statistics)
    pub async fn count_created_between(&self, start: i64, end: i64) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Row {
            total: i64,
        }
        let rows: Vec<Row> = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM custom_order WHERE created_at >= $start AND created_at < $end GROUP ALL",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Create a new request (storefront submission)
    pub async fn create(&self, data: CustomOrderCreate) -> RepoResult<CustomOrderRequest> {
        let request = CustomOrderRequest {
            id: None,
            name: data.name,
            phone: data.phone,
            email: data.email,
            occasion: data.occasion.unwrap_or_default(),
            serves: data.serves,
            flavor_notes: data.flavor_notes.unwrap_or_default(),
            design_notes: data.design_notes.unwrap_or_default(),
            budget: data.budget,
            event_date: data.event_date,
            reference_image: data.reference_image,
            status: CustomOrderStatus::New,
            quoted_price: None,
            admin_notes: String::new(),
            created_at: shared::now_millis(),
        };

        let created: Option<CustomOrderRequest> =
            self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create custom order".to_string()))
    }

    /// Back-office patch: status / quoted_price / admin_notes
    pub async fn update(&self, id: &str, data: CustomOrderUpdate) -> RepoResult<CustomOrderRequest> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Custom order {} not found", id)))?;

        self.base
            .db()
            .query("UPDATE $request MERGE $data")
            .bind(("request", record))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Custom order {} not found", id)))
    }
}
