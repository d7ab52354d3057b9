//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus, OrderUpdate, PaymentStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List orders (paginated, newest first, optional status filters)
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> RepoResult<Vec<Order>> {
        // 过滤条件作为 bind 参数；NONE 时条件恒真
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                r#"
                SELECT * FROM order
                WHERE ($status = NONE OR status = $status)
                  AND ($payment = NONE OR payment_status = $payment)
                ORDER BY created_at DESC
                LIMIT $limit START $offset
                "#,
            )
            .bind(("status", status))
            .bind(("payment", payment_status))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Count orders matching the same filters (for pagination)
    pub async fn count(
        &self,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Row {
            total: i64,
        }
        let rows: Vec<Row> = self
            .base
            .db()
            .query(
                r#"
                SELECT count() AS total FROM order
                WHERE ($status = NONE OR status = $status)
                  AND ($payment = NONE OR payment_status = $payment)
                GROUP ALL
                "#,
            )
            .bind(("status", status))
            .bind(("payment", payment_status))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record = self.base.parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record).await?;
        Ok(order)
    }

    /// Find order by its human-facing order number
    pub async fn find_by_order_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let number = order_number.trim().to_uppercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Orders created in `[start, end)` (Unix millis), oldest first
    pub async fn find_created_between(&self, start: i64, end: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE created_at >= $start AND created_at < $end ORDER BY created_at",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Create an order (items embedded, single document write)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Admin patch: status / payment_status / payment_reference / admin_notes
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        // updated_at 跟随补丁一起 MERGE
        let mut patch = serde_json::to_value(&data).map_err(|e| RepoError::Database(e.to_string()))?;
        if let Some(obj) = patch.as_object_mut() {
            obj.insert("updated_at".into(), serde_json::json!(shared::now_millis()));
        }

        self.base
            .db()
            .query("UPDATE $order MERGE $data")
            .bind(("order", record))
            .bind(("data", patch))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
