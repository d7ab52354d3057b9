//! Statistics API Handlers
//!
//! 后台仪表盘聚合。订单量是小店规模，直接拉取区间内订单在内存聚合；
//! 金额求和走 Decimal，按营业时区分日。

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Duration};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, PaymentStatus};
use crate::db::repository::{CustomOrderRepository, OrderRepository};
use crate::pricing::{to_decimal, to_f64};
use crate::utils::{AppResult, time};

// ============================================================================
// Response Types
// ============================================================================

/// Overview statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewStats {
    /// 非取消订单的总额合计
    pub revenue: f64,
    /// 已收款 (payment_status = PAID) 的总额合计
    pub paid_revenue: f64,
    pub orders: i64,
    pub pending_orders: i64,
    pub unpaid_orders: i64,
    pub average_order_value: f64,
    pub total_discount: f64,
    /// 区间内新的定制蛋糕请求数
    pub custom_requests: i64,
}

/// Revenue trend data point (daily bucket)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueTrendPoint {
    /// YYYY-MM-DD (营业时区)
    pub date: String,
    pub revenue: f64,
    pub orders: i64,
}

/// Top cake data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCake {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Order status breakdown entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Full statistics response
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub overview: OverviewStats,
    pub revenue_trend: Vec<RevenueTrendPoint>,
    pub top_cakes: Vec<TopCake>,
    pub status_breakdown: Vec<StatusCount>,
    pub recent_orders: Vec<Order>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    #[serde(rename = "timeRange", default = "default_time_range")]
    pub time_range: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

fn default_time_range() -> String {
    "today".to_string()
}

// ============================================================================
// Time Range Calculation
// ============================================================================

/// Resolve a time range name to `[start, end)` Unix millis in the business timezone
fn calculate_time_range(
    time_range: &str,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    tz: chrono_tz::Tz,
) -> (i64, i64) {
    let today = time::today(tz);
    let tomorrow = today + Duration::days(1);

    match time_range {
        "week" => {
            let weekday = today.weekday().num_days_from_monday();
            let week_start = today - Duration::days(weekday as i64);
            (time::day_start_millis(week_start, tz), time::day_start_millis(tomorrow, tz))
        }
        "month" => {
            let month_start = today.with_day(1).unwrap_or(today);
            (time::day_start_millis(month_start, tz), time::day_start_millis(tomorrow, tz))
        }
        "custom" => {
            match (
                custom_start.and_then(|s| time::parse_date(s).ok()),
                custom_end.and_then(|s| time::parse_date(s).ok()),
            ) {
                (Some(start), Some(end)) => {
                    (time::day_start_millis(start, tz), time::day_end_millis(end, tz))
                }
                // 自定义区间缺参时退回今天
                _ => (time::day_start_millis(today, tz), time::day_start_millis(tomorrow, tz)),
            }
        }
        // "today" 及未知值
        _ => (time::day_start_millis(today, tz), time::day_start_millis(tomorrow, tz)),
    }
}

// ============================================================================
// Aggregation
// ============================================================================

const TOP_CAKES_LIMIT: usize = 10;
const RECENT_ORDERS_LIMIT: usize = 10;

fn build_overview(orders: &[Order], custom_requests: i64) -> OverviewStats {
    let mut revenue = Decimal::ZERO;
    let mut paid_revenue = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;
    let mut counted = 0_i64;
    let mut pending = 0_i64;
    let mut unpaid = 0_i64;

    for order in orders {
        if !order.status.counts_for_revenue() {
            continue;
        }
        counted += 1;
        revenue += to_decimal(order.total);
        total_discount += to_decimal(order.discount);
        if order.payment_status == PaymentStatus::Paid {
            paid_revenue += to_decimal(order.total);
        } else if order.payment_status == PaymentStatus::Unpaid {
            unpaid += 1;
        }
        if order.status == OrderStatus::Pending {
            pending += 1;
        }
    }

    let average = if counted > 0 {
        revenue / Decimal::from(counted)
    } else {
        Decimal::ZERO
    };

    OverviewStats {
        revenue: to_f64(revenue),
        paid_revenue: to_f64(paid_revenue),
        orders: counted,
        pending_orders: pending,
        unpaid_orders: unpaid,
        average_order_value: to_f64(average),
        total_discount: to_f64(total_discount),
        custom_requests,
    }
}

fn build_revenue_trend(orders: &[Order], tz: chrono_tz::Tz) -> Vec<RevenueTrendPoint> {
    let mut buckets: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    for order in orders {
        if !order.status.counts_for_revenue() {
            continue;
        }
        let date = chrono::DateTime::from_timestamp_millis(order.created_at)
            .map(|dt| dt.with_timezone(&tz).date_naive().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let entry = buckets.entry(date).or_insert((Decimal::ZERO, 0));
        entry.0 += to_decimal(order.total);
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (revenue, count))| RevenueTrendPoint {
            date,
            revenue: to_f64(revenue),
            orders: count,
        })
        .collect()
}

fn build_top_cakes(orders: &[Order]) -> Vec<TopCake> {
    let mut by_cake: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for order in orders {
        if !order.status.counts_for_revenue() {
            continue;
        }
        for item in &order.items {
            let entry = by_cake
                .entry(item.cake_name.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += item.quantity;
            entry.1 += to_decimal(item.line_total);
        }
    }

    let mut top: Vec<TopCake> = by_cake
        .into_iter()
        .map(|(name, (quantity, revenue))| TopCake {
            name,
            quantity,
            revenue: to_f64(revenue),
        })
        .collect();
    top.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    top.truncate(TOP_CAKES_LIMIT);
    top
}

fn build_status_breakdown(orders: &[Order]) -> Vec<StatusCount> {
    const ALL_STATUSES: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    ALL_STATUSES
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: orders.iter().filter(|o| o.status == *status).count() as i64,
        })
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/statistics - 后台仪表盘
pub async fn get_statistics(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<StatisticsResponse>> {
    let tz = state.config.timezone;
    let (start, end) = calculate_time_range(
        &query.time_range,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        tz,
    );

    let order_repo = OrderRepository::new(state.db.clone());
    let custom_repo = CustomOrderRepository::new(state.db.clone());

    let orders = order_repo.find_created_between(start, end).await?;
    let custom_requests = custom_repo.count_created_between(start, end).await?;

    let overview = build_overview(&orders, custom_requests);
    let revenue_trend = build_revenue_trend(&orders, tz);
    let top_cakes = build_top_cakes(&orders);
    let status_breakdown = build_status_breakdown(&orders);

    let mut recent_orders = orders;
    recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_orders.truncate(RECENT_ORDERS_LIMIT);

    Ok(Json(StatisticsResponse {
        overview,
        revenue_trend,
        top_cakes,
        status_breakdown,
        recent_orders,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderItem;

    fn order(total: f64, discount: f64, status: OrderStatus, payment: PaymentStatus, created_at: i64) -> Order {
        Order {
            id: None,
            order_number: format!("CK-{}", created_at),
            customer_name: "Test".to_string(),
            phone: "+254700000000".to_string(),
            email: "test@example.com".to_string(),
            address_line: "Somewhere".to_string(),
            city: "Nairobi".to_string(),
            notes: String::new(),
            delivery_date: "2026-08-20".to_string(),
            delivery_time: "10:00 - 12:00".to_string(),
            items: vec![OrderItem {
                cake_id: "cake:choc".to_string(),
                cake_name: "Chocolate Fudge".to_string(),
                selected_size: "Medium".to_string(),
                selected_flavor: "Chocolate".to_string(),
                selected_layer: "Single Layer".to_string(),
                quantity: 2,
                unit_price: total / 2.0,
                discounted_unit_price: total / 2.0,
                line_total: total,
            }],
            subtotal: total,
            delivery_fee: 0.0,
            discount,
            total,
            promo_code: None,
            status,
            payment_status: payment,
            payment_method: "MPESA_PAYBILL".to_string(),
            payment_reference: None,
            admin_notes: String::new(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn cancelled_orders_excluded_from_revenue() {
        let orders = vec![
            order(5000.0, 0.0, OrderStatus::Pending, PaymentStatus::Unpaid, 1),
            order(3000.0, 500.0, OrderStatus::Delivered, PaymentStatus::Paid, 2),
            order(9999.0, 0.0, OrderStatus::Cancelled, PaymentStatus::Refunded, 3),
        ];
        let overview = build_overview(&orders, 0);
        assert_eq!(overview.revenue, 8000.0);
        assert_eq!(overview.paid_revenue, 3000.0);
        assert_eq!(overview.orders, 2);
        assert_eq!(overview.pending_orders, 1);
        assert_eq!(overview.unpaid_orders, 1);
        assert_eq!(overview.average_order_value, 4000.0);
        assert_eq!(overview.total_discount, 500.0);
    }

    #[test]
    fn top_cakes_sorted_by_quantity() {
        let mut o1 = order(4000.0, 0.0, OrderStatus::Delivered, PaymentStatus::Paid, 1);
        o1.items[0].cake_name = "Red Velvet".to_string();
        o1.items[0].quantity = 5;
        let o2 = order(2000.0, 0.0, OrderStatus::Pending, PaymentStatus::Unpaid, 2);

        let top = build_top_cakes(&[o1, o2]);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Red Velvet");
        assert_eq!(top[0].quantity, 5);
    }

    #[test]
    fn status_breakdown_covers_all_statuses() {
        let orders = vec![order(1000.0, 0.0, OrderStatus::Pending, PaymentStatus::Unpaid, 1)];
        let breakdown = build_status_breakdown(&orders);
        assert_eq!(breakdown.len(), 6);
        assert_eq!(breakdown[0].status, OrderStatus::Pending);
        assert_eq!(breakdown[0].count, 1);
        assert_eq!(breakdown[5].count, 0);
    }
}
