//! Promo Code Validation & Discount Computation
//!
//! 校验顺序固定：存在 → 激活 → 时间窗口 → 限额 → 小计下限。
//! 折扣金额永远被夹在 `[0, subtotal]` 内，优惠不可能把订单打成负数。

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::models::{PromoCode, PromoType};

use super::calculator::{to_decimal, to_f64};

/// Promo validation failure, serialized as the storefront error string
/// (INVALID_CODE, EXPIRED, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoRejection {
    /// No promo matches the submitted code
    InvalidCode,
    /// Promo exists but has been deactivated
    Inactive,
    /// `now < valid_from`
    NotYetValid,
    /// `now > valid_until`
    Expired,
    /// `usage_count >= usage_limit`
    UsageLimitReached,
    /// `subtotal < min_order`
    MinOrderNotMet,
}

impl PromoRejection {
    /// Storefront-facing error string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCode => "INVALID_CODE",
            Self::Inactive => "INACTIVE",
            Self::NotYetValid => "NOT_YET_VALID",
            Self::Expired => "EXPIRED",
            Self::UsageLimitReached => "USAGE_LIMIT_REACHED",
            Self::MinOrderNotMet => "MIN_ORDER_NOT_MET",
        }
    }

    /// Unified error code for checkout-time hard failures
    pub fn error_code(&self) -> shared::error::ErrorCode {
        use shared::error::ErrorCode;
        match self {
            Self::InvalidCode => ErrorCode::PromoNotFound,
            Self::Inactive => ErrorCode::PromoInactive,
            Self::NotYetValid => ErrorCode::PromoNotYetValid,
            Self::Expired => ErrorCode::PromoExpired,
            Self::UsageLimitReached => ErrorCode::PromoUsageLimitReached,
            Self::MinOrderNotMet => ErrorCode::PromoMinOrderNotMet,
        }
    }
}

impl std::fmt::Display for PromoRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a promo against a subtotal and compute the discount amount
///
/// `now_millis` 由调用方传入，时间相关的行为可测试。
/// Returns the clamped discount amount (2 dp, half-up) on success.
pub fn validate_promo(
    promo: &PromoCode,
    subtotal: f64,
    now_millis: i64,
) -> Result<f64, PromoRejection> {
    if !promo.is_active {
        return Err(PromoRejection::Inactive);
    }

    // 时间窗口：任一边界缺失表示该侧无界
    if let Some(from) = promo.valid_from
        && now_millis < from
    {
        return Err(PromoRejection::NotYetValid);
    }
    if let Some(until) = promo.valid_until
        && now_millis > until
    {
        return Err(PromoRejection::Expired);
    }

    if let Some(limit) = promo.usage_limit
        && promo.usage_count >= limit
    {
        return Err(PromoRejection::UsageLimitReached);
    }

    if let Some(min_order) = promo.min_order
        && subtotal < min_order
    {
        return Err(PromoRejection::MinOrderNotMet);
    }

    Ok(discount_amount(promo, subtotal))
}

/// Discount amount for a valid promo, clamped to `[0, subtotal]`
///
/// PERCENTAGE: `subtotal * discount / 100`, capped by max_discount when set.
/// FIXED: `discount`.
fn discount_amount(promo: &PromoCode, subtotal: f64) -> f64 {
    let subtotal_dec = to_decimal(subtotal);

    let raw = match promo.promo_type {
        PromoType::Percentage => {
            let mut amount = subtotal_dec * to_decimal(promo.discount) / Decimal::ONE_HUNDRED;
            if let Some(cap) = promo.max_discount {
                amount = amount.min(to_decimal(cap));
            }
            amount
        }
        PromoType::Fixed => to_decimal(promo.discount),
    };

    let clamped = raw.max(Decimal::ZERO).min(subtotal_dec);
    to_f64(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage_promo(discount: f64, max_discount: Option<f64>) -> PromoCode {
        PromoCode {
            id: None,
            code: "SAVE10".to_string(),
            description: String::new(),
            promo_type: PromoType::Percentage,
            discount,
            min_order: None,
            max_discount,
            valid_from: None,
            valid_until: None,
            usage_limit: None,
            usage_count: 0,
            is_active: true,
            created_at: 0,
        }
    }

    fn fixed_promo(discount: f64) -> PromoCode {
        PromoCode {
            promo_type: PromoType::Fixed,
            discount,
            max_discount: None,
            ..percentage_promo(0.0, None)
        }
    }

    #[test]
    fn percentage_with_cap() {
        // discount=10, max_discount=500 → min(0.10*S, 500)
        let promo = percentage_promo(10.0, Some(500.0));
        assert_eq!(validate_promo(&promo, 3000.0, 0).unwrap(), 300.0);
        assert_eq!(validate_promo(&promo, 5000.0, 0).unwrap(), 500.0);
        assert_eq!(validate_promo(&promo, 50000.0, 0).unwrap(), 500.0);
    }

    #[test]
    fn discount_never_exceeds_subtotal() {
        // FIXED 300 on subtotal 200 → 200 (clamped), not 300
        let promo = fixed_promo(300.0);
        assert_eq!(validate_promo(&promo, 200.0, 0).unwrap(), 200.0);
        // and never negative
        let promo = percentage_promo(10.0, None);
        assert_eq!(validate_promo(&promo, 0.0, 0).unwrap(), 0.0);
    }

    #[test]
    fn inactive_rejected() {
        let mut promo = fixed_promo(100.0);
        promo.is_active = false;
        assert_eq!(
            validate_promo(&promo, 1000.0, 0).unwrap_err(),
            PromoRejection::Inactive
        );
    }

    #[test]
    fn validity_window() {
        let mut promo = fixed_promo(100.0);
        promo.valid_from = Some(1000);
        promo.valid_until = Some(2000);

        assert_eq!(
            validate_promo(&promo, 1000.0, 500).unwrap_err(),
            PromoRejection::NotYetValid
        );
        assert!(validate_promo(&promo, 1000.0, 1500).is_ok());
        assert_eq!(
            validate_promo(&promo, 1000.0, 2500).unwrap_err(),
            PromoRejection::Expired
        );

        // 缺失边界 = 该侧无界
        promo.valid_from = None;
        assert!(validate_promo(&promo, 1000.0, 500).is_ok());
        promo.valid_until = None;
        assert!(validate_promo(&promo, 1000.0, i64::MAX).is_ok());
    }

    #[test]
    fn usage_limit_boundary() {
        let mut promo = fixed_promo(100.0);
        promo.usage_limit = Some(50);
        promo.usage_count = 49;
        assert!(validate_promo(&promo, 1000.0, 0).is_ok());

        // usage_count == usage_limit → USAGE_LIMIT_REACHED
        promo.usage_count = 50;
        assert_eq!(
            validate_promo(&promo, 1000.0, 0).unwrap_err(),
            PromoRejection::UsageLimitReached
        );
    }

    #[test]
    fn min_order_boundary() {
        let mut promo = fixed_promo(100.0);
        promo.min_order = Some(1000.0);
        assert_eq!(
            validate_promo(&promo, 999.99, 0).unwrap_err(),
            PromoRejection::MinOrderNotMet
        );
        assert!(validate_promo(&promo, 1000.0, 0).is_ok());
    }

    #[test]
    fn rejection_strings_match_storefront_contract() {
        assert_eq!(PromoRejection::InvalidCode.as_str(), "INVALID_CODE");
        assert_eq!(PromoRejection::UsageLimitReached.as_str(), "USAGE_LIMIT_REACHED");
        assert_eq!(PromoRejection::MinOrderNotMet.as_str(), "MIN_ORDER_NOT_MET");
    }
}
