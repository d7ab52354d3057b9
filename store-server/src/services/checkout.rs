//! Checkout Service
//!
//! 下单唯一路径：服务端重算所有金额（目录单价、批量折扣、优惠码），
//! 客户端提交的价格只用于漂移比对和告警。
//!
//! 顺序：校验行项目 → 重算小计 → 优惠码原子认领 → 条件扣库存 →
//! 写入订单。后两步失败时回滚已认领的优惠额度和已扣库存（尽力补偿）。

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use shared::error::ErrorCode;

use crate::db::models::{Order, OrderItem, OrderStatus, PaymentStatus, StoreInfo};
use crate::db::repository::{CakeRepository, OrderRepository, PromoCodeRepository, StoreInfoRepository};
use crate::pricing::{
    LinePricing, PricingError, PromoRejection, calculate_order_totals, price_line,
    sum_line_totals, validate_promo,
};
use crate::utils::validation::normalize_promo_code;
use crate::utils::{AppError, AppResult, time};

/// 金额漂移容差 (KSh 0.01)
const MONEY_TOLERANCE: f64 = 0.01;

/// 单行最大数量
const MAX_QUANTITY: i64 = 999;

// =============================================================================
// Request / Response DTOs
// =============================================================================

/// Checkout line item (from the storefront cart)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// "cake:xxx"
    pub cake_id: String,
    pub quantity: i64,
    pub selected_size: String,
    pub selected_flavor: String,
    pub selected_layer: String,
    /// 客户端展示的单价 (仅用于漂移比对)
    pub price: f64,
}

/// Checkout request (POST /api/orders)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    /// 客户端计算的小计 (仅用于漂移比对)
    pub subtotal: f64,
    pub promo_code: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 7, max = 100))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 500))]
    pub address_line: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub notes: String,
    /// YYYY-MM-DD
    pub delivery_date: String,
    #[validate(length(min = 1, max = 100))]
    pub delivery_time: String,
}

/// Quote request (POST /api/orders/quote) — 购物车展示用的服务端报价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub items: Vec<CheckoutItem>,
    pub promo_code: Option<String>,
}

/// 单行报价 (返回给购物车)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLine {
    pub cake_id: String,
    pub cake_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub volume_rate: f64,
    pub discounted_unit_price: f64,
    pub line_total: f64,
}

/// Quote response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub lines: Vec<QuoteLine>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub total: f64,
    /// 优惠码校验结果 (软失败)
    pub promo_valid: Option<bool>,
    pub promo_error: Option<String>,
}

/// Paybill 付款指引 (结账响应携带，人工对账流程)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstructions {
    /// M-Pesa Paybill 商户号
    pub paybill_number: String,
    /// Account reference = 订单号
    pub account_reference: String,
    pub amount: f64,
    pub instructions: String,
}

/// Checkout response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub payment_instructions: PaymentInstructions,
}

// =============================================================================
// Service
// =============================================================================

/// Checkout service — owns the order creation path
#[derive(Clone)]
pub struct CheckoutService {
    cake_repo: CakeRepository,
    promo_repo: PromoCodeRepository,
    order_repo: OrderRepository,
    store_repo: StoreInfoRepository,
    tz: chrono_tz::Tz,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>, tz: chrono_tz::Tz) -> Self {
        Self {
            cake_repo: CakeRepository::new(db.clone()),
            promo_repo: PromoCodeRepository::new(db.clone()),
            order_repo: OrderRepository::new(db.clone()),
            store_repo: StoreInfoRepository::new(db),
            tz,
        }
    }

    /// 购物车报价：逐行重算 + 软校验优惠码
    pub async fn quote(&self, req: QuoteRequest) -> AppResult<QuoteResponse> {
        if req.items.is_empty() {
            return Err(AppError::business(ErrorCode::EmptyOrder, "Cart is empty"));
        }

        let store = self.load_store_info().await?;
        let priced = self.price_items(&req.items).await?;
        let lines: Vec<QuoteLine> = priced
            .iter()
            .map(|(item, name, pricing)| QuoteLine {
                cake_id: item.cake_id.clone(),
                cake_name: name.clone(),
                quantity: item.quantity,
                unit_price: pricing.unit_price,
                volume_rate: pricing.volume_rate,
                discounted_unit_price: pricing.discounted_unit_price,
                line_total: pricing.line_total,
            })
            .collect();

        let pricings: Vec<LinePricing> = priced.iter().map(|(_, _, p)| p.clone()).collect();
        let subtotal = sum_line_totals(&pricings);

        // 优惠码软校验：无效时报价继续，错误串返回给前台展示
        let (discount, promo_valid, promo_error) = match &req.promo_code {
            None => (0.0, None, None),
            Some(code) => match self.check_promo(code, subtotal).await? {
                Ok(amount) => (amount, Some(true), None),
                Err(rejection) => (0.0, Some(false), Some(rejection.as_str().to_string())),
            },
        };

        let totals = calculate_order_totals(subtotal, store.delivery_fee, discount);

        Ok(QuoteResponse {
            lines,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            discount: totals.discount,
            total: totals.total,
            promo_valid,
            promo_error,
        })
    }

    /// 结账：重算、认领优惠额度、扣库存、写订单
    pub async fn checkout(&self, req: CheckoutRequest) -> AppResult<CheckoutResponse> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if req.items.is_empty() {
            return Err(AppError::business(ErrorCode::EmptyOrder, "Order has no items"));
        }

        let delivery_date = time::parse_date(&req.delivery_date)?;
        time::validate_not_past(delivery_date, self.tz)?;

        let store = self.load_store_info().await?;
        let priced = self.price_items(&req.items).await?;

        // 逐行漂移比对：客户端单价 vs 服务端单价
        for (item, _, pricing) in &priced {
            if (item.price - pricing.discounted_unit_price).abs() > MONEY_TOLERANCE {
                tracing::warn!(
                    cake_id = %item.cake_id,
                    client_price = item.price,
                    server_price = pricing.discounted_unit_price,
                    "Client unit price drifts from catalog, using server price"
                );
            }
        }

        let pricings: Vec<LinePricing> = priced.iter().map(|(_, _, p)| p.clone()).collect();
        let subtotal = sum_line_totals(&pricings);
        if (req.subtotal - subtotal).abs() > MONEY_TOLERANCE {
            tracing::warn!(
                client_subtotal = req.subtotal,
                server_subtotal = subtotal,
                "Client subtotal drifts from recomputed subtotal, using server figure"
            );
        }

        // 优惠码：先校验，再原子认领一次额度
        let mut discount = 0.0;
        let mut claimed_code: Option<String> = None;
        if let Some(code) = &req.promo_code {
            match self.check_promo(code, subtotal).await? {
                Err(rejection) => {
                    return Err(AppError::business(
                        rejection.error_code(),
                        format!("Promo code rejected: {}", rejection),
                    ));
                }
                Ok(amount) => {
                    // 条件 UPDATE 关闭"检查-递增"竞态：校验通过后名额仍可能被
                    // 并发结账抢走，认领失败同样返回 USAGE_LIMIT_REACHED。
                    if !self.promo_repo.try_claim_usage(code).await? {
                        return Err(AppError::business(
                            ErrorCode::PromoUsageLimitReached,
                            format!("Promo code rejected: {}", PromoRejection::UsageLimitReached),
                        ));
                    }
                    discount = amount;
                    claimed_code = Some(code.clone());
                }
            }
        }

        // 条件扣库存；失败时回滚优惠认领和已扣的行
        let mut decremented: Vec<(String, i64)> = Vec::new();
        for (item, name, _) in &priced {
            match self.cake_repo.decrement_stock(&item.cake_id, item.quantity).await {
                Ok(true) => decremented.push((item.cake_id.clone(), item.quantity)),
                Ok(false) => {
                    self.rollback(&claimed_code, &decremented).await;
                    return Err(AppError::business(
                        ErrorCode::InsufficientStock,
                        format!("Not enough stock of '{}' for quantity {}", name, item.quantity),
                    ));
                }
                Err(e) => {
                    self.rollback(&claimed_code, &decremented).await;
                    return Err(e.into());
                }
            }
        }

        let totals = calculate_order_totals(subtotal, store.delivery_fee, discount);
        let now = shared::now_millis();

        let items: Vec<OrderItem> = priced
            .iter()
            .map(|(item, name, pricing)| OrderItem {
                cake_id: item.cake_id.clone(),
                cake_name: name.clone(),
                selected_size: item.selected_size.clone(),
                selected_flavor: item.selected_flavor.clone(),
                selected_layer: item.selected_layer.clone(),
                quantity: item.quantity,
                unit_price: pricing.unit_price,
                discounted_unit_price: pricing.discounted_unit_price,
                line_total: pricing.line_total,
            })
            .collect();

        let order = Order {
            id: None,
            order_number: shared::order_number(),
            customer_name: req.customer_name,
            phone: req.phone,
            email: req.email,
            address_line: req.address_line,
            city: req.city,
            notes: req.notes,
            delivery_date: req.delivery_date,
            delivery_time: req.delivery_time,
            items,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            discount: totals.discount,
            total: totals.total,
            promo_code: claimed_code.as_deref().map(normalize_promo_code),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: "MPESA_PAYBILL".to_string(),
            payment_reference: None,
            admin_notes: String::new(),
            created_at: now,
            updated_at: now,
        };

        let created = match self.order_repo.create(order).await {
            Ok(order) => order,
            Err(e) => {
                self.rollback(&claimed_code, &decremented).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            order_number = %created.order_number,
            total = created.total,
            promo = created.promo_code.as_deref().unwrap_or("-"),
            "Order created"
        );

        let payment_instructions = build_payment_instructions(&store, &created);

        Ok(CheckoutResponse {
            order: created,
            payment_instructions,
        })
    }

    // ── internals ───────────────────────────────────────────────────

    async fn load_store_info(&self) -> AppResult<StoreInfo> {
        self.store_repo
            .get()
            .await?
            .ok_or_else(|| AppError::internal("Store settings missing"))
    }

    /// 逐行定价：加载蛋糕、检查可购买性、重算单价和行小计
    ///
    /// 返回 (输入行, 蛋糕名快照, 定价)。
    async fn price_items(
        &self,
        items: &[CheckoutItem],
    ) -> AppResult<Vec<(CheckoutItem, String, LinePricing)>> {
        let mut priced = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity <= 0 || item.quantity > MAX_QUANTITY {
                return Err(AppError::validation(format!(
                    "Quantity must be in 1..={}, got {}",
                    MAX_QUANTITY, item.quantity
                )));
            }

            let cake = self
                .cake_repo
                .find_by_id(&item.cake_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Cake {}", item.cake_id)))?;

            if !cake.is_purchasable() {
                return Err(AppError::business(
                    ErrorCode::CakeNotAvailable,
                    format!("'{}' is not available for purchase", cake.name),
                ));
            }

            let pricing = price_line(
                &cake,
                &item.selected_size,
                &item.selected_flavor,
                &item.selected_layer,
                item.quantity,
            )
            .map_err(map_pricing_error)?;

            priced.push((item.clone(), cake.name, pricing));
        }
        Ok(priced)
    }

    /// 优惠码查找 + 校验 (不递增计数)
    ///
    /// 外层 Result 是系统错误，内层 Result 是业务校验结果。
    async fn check_promo(
        &self,
        code: &str,
        subtotal: f64,
    ) -> AppResult<Result<f64, PromoRejection>> {
        let promo = match self.promo_repo.find_by_code(code).await? {
            Some(promo) => promo,
            None => return Ok(Err(PromoRejection::InvalidCode)),
        };
        Ok(validate_promo(&promo, subtotal, shared::now_millis()))
    }

    /// 尽力补偿：释放优惠认领、回补已扣库存
    async fn rollback(&self, claimed_code: &Option<String>, decremented: &[(String, i64)]) {
        if let Some(code) = claimed_code
            && let Err(e) = self.promo_repo.release_usage(code).await
        {
            tracing::error!(code = %code, error = %e, "Failed to release promo usage claim");
        }
        for (cake_id, quantity) in decremented {
            if let Err(e) = self.cake_repo.restore_stock(cake_id, *quantity).await {
                tracing::error!(cake_id = %cake_id, error = %e, "Failed to restore stock");
            }
        }
    }
}

/// Map a pricing failure to the API error
fn map_pricing_error(err: PricingError) -> AppError {
    match err {
        PricingError::UnknownSize(_)
        | PricingError::UnknownLayer(_)
        | PricingError::UnknownFlavor(_) => {
            AppError::business(ErrorCode::InvalidSelection, err.to_string())
        }
        PricingError::InvalidQuantity(_) => AppError::validation(err.to_string()),
    }
}

/// Paybill 指引：商户号来自商店设置，account reference = 订单号
fn build_payment_instructions(store: &StoreInfo, order: &Order) -> PaymentInstructions {
    PaymentInstructions {
        paybill_number: store.paybill_number.clone(),
        account_reference: order.order_number.clone(),
        amount: order.total,
        instructions: format!(
            "Go to M-Pesa > Lipa na M-Pesa > Paybill. Enter business number {}, \
             account number {}, amount KSh {}. We confirm payments manually \
             during opening hours.",
            store.paybill_number, order.order_number, order.total
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_instructions_reference_order_number() {
        let store = StoreInfo {
            paybill_number: "522533".to_string(),
            ..StoreInfo::default_settings()
        };
        let order = Order {
            id: None,
            order_number: "CK-TEST1".to_string(),
            customer_name: "Amina".to_string(),
            phone: "+254700000001".to_string(),
            email: "amina@example.com".to_string(),
            address_line: "Riverside Drive 12".to_string(),
            city: "Nairobi".to_string(),
            notes: String::new(),
            delivery_date: "2026-08-20".to_string(),
            delivery_time: "10:00 - 12:00".to_string(),
            items: vec![],
            subtotal: 4000.0,
            delivery_fee: 500.0,
            discount: 0.0,
            total: 4500.0,
            promo_code: None,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: "MPESA_PAYBILL".to_string(),
            payment_reference: None,
            admin_notes: String::new(),
            created_at: 0,
            updated_at: 0,
        };

        let instructions = build_payment_instructions(&store, &order);
        assert_eq!(instructions.paybill_number, "522533");
        assert_eq!(instructions.account_reference, "CK-TEST1");
        assert_eq!(instructions.amount, 4500.0);
        assert!(instructions.instructions.contains("522533"));
        assert!(instructions.instructions.contains("CK-TEST1"));
    }
}
