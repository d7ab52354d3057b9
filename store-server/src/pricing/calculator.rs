//! Item Price Calculator
//!
//! Unit price resolution and quantity-based volume discounts.
//! Uses rust_decimal for precise calculations, stores as f64.
//!
//! 单价不变式: `base_price + size.price + layer.price`，口味不加价。
//! 批量折扣对单价取整 (半进位到整数 KSh)，再乘数量得行小计 —
//! 取整发生在单价而不是行小计上。

use rust_decimal::prelude::*;
use thiserror::Error;

use crate::db::models::Cake;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

// ==================== Conversion Helpers ====================

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round to whole shillings, half-up (unit prices after volume discount)
#[inline]
fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ==================== Errors ====================

/// Pricing failure: the submitted selection does not match the catalog
///
/// 旧版行为是静默按 0 加价兜底；这里选择显式拒绝 (见 DESIGN.md)。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Size '{0}' is not configured on this cake")]
    UnknownSize(String),

    #[error("Layer '{0}' is not configured on this cake")]
    UnknownLayer(String),

    #[error("Flavor '{0}' is not configured on this cake")]
    UnknownFlavor(String),

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),
}

// ==================== Unit Price ====================

/// Resolve the unit price for a size + layer selection
///
/// `base_price + size.price + layer.price`. Flavor is validated for
/// membership but never affects the price.
pub fn resolve_unit_price(
    cake: &Cake,
    size_name: &str,
    flavor_name: &str,
    layer_name: &str,
) -> Result<f64, PricingError> {
    let size = cake
        .find_size(size_name)
        .ok_or_else(|| PricingError::UnknownSize(size_name.to_string()))?;
    let layer = cake
        .find_layer(layer_name)
        .ok_or_else(|| PricingError::UnknownLayer(layer_name.to_string()))?;
    if !cake.has_flavor(flavor_name) {
        return Err(PricingError::UnknownFlavor(flavor_name.to_string()));
    }

    let unit = to_decimal(cake.base_price) + to_decimal(size.price) + to_decimal(layer.price);
    Ok(to_f64(unit))
}

// ==================== Volume Discount ====================

/// Quantity-tiered discount rate (step function)
///
/// | 数量 | 折扣率 |
/// |------|--------|
/// | ≥ 10 | 0.15 |
/// | ≥ 5 | 0.10 |
/// | ≥ 3 | 0.05 |
/// | < 3 | 0 |
pub fn volume_discount_rate(quantity: i64) -> Decimal {
    if quantity >= 10 {
        Decimal::new(15, 2)
    } else if quantity >= 5 {
        Decimal::new(10, 2)
    } else if quantity >= 3 {
        Decimal::new(5, 2)
    } else {
        Decimal::ZERO
    }
}

// ==================== Line Pricing ====================

/// Priced purchase line (snapshot values stored on the order)
#[derive(Debug, Clone, PartialEq)]
pub struct LinePricing {
    /// base + size + layer
    pub unit_price: f64,
    /// Volume discount rate applied ([0, 0.15])
    pub volume_rate: f64,
    /// round(unit_price * (1 - rate)), whole shillings
    pub discounted_unit_price: f64,
    /// discounted_unit_price * quantity
    pub line_total: f64,
}

/// Price one line: unit price, volume discount, line total
///
/// Rounding happens on the discounted unit price, NOT on the line total,
/// so `line_total` is always an exact multiple of `discounted_unit_price`.
pub fn price_line(
    cake: &Cake,
    size_name: &str,
    flavor_name: &str,
    layer_name: &str,
    quantity: i64,
) -> Result<LinePricing, PricingError> {
    if quantity <= 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }

    let unit_price = resolve_unit_price(cake, size_name, flavor_name, layer_name)?;
    let rate = volume_discount_rate(quantity);

    let unit = to_decimal(unit_price);
    let discounted_unit = round_whole(unit * (Decimal::ONE - rate));
    let line_total = discounted_unit * Decimal::from(quantity);

    Ok(LinePricing {
        unit_price,
        volume_rate: rate.to_f64().unwrap_or_default(),
        discounted_unit_price: to_f64(discounted_unit),
        line_total: to_f64(line_total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CakeLayer, CakeSize};

    fn sample_cake() -> Cake {
        Cake {
            id: None,
            name: "Chocolate Fudge".to_string(),
            description: String::new(),
            image: String::new(),
            category: "Birthday".to_string(),
            base_price: 2000.0,
            sizes: vec![
                CakeSize {
                    name: "Small".to_string(),
                    price: 0.0,
                    serves: "4-6".to_string(),
                },
                CakeSize {
                    name: "Medium".to_string(),
                    price: 800.0,
                    serves: "8-10".to_string(),
                },
                CakeSize {
                    name: "Large".to_string(),
                    price: 1500.0,
                    serves: "12-15".to_string(),
                },
            ],
            flavors: vec!["Vanilla".to_string(), "Chocolate".to_string()],
            layers: vec![
                CakeLayer {
                    name: "Single Layer".to_string(),
                    price: 0.0,
                },
                CakeLayer {
                    name: "Double Layer".to_string(),
                    price: 500.0,
                },
            ],
            stock: None,
            in_stock: true,
            is_visible: true,
            sort_order: 0,
            created_at: 0,
        }
    }

    #[test]
    fn unit_price_is_base_plus_size_plus_layer() {
        let cake = sample_cake();
        let unit = resolve_unit_price(&cake, "Medium", "Vanilla", "Double Layer").unwrap();
        assert_eq!(unit, 3300.0);
    }

    #[test]
    fn flavor_does_not_affect_price() {
        let cake = sample_cake();
        let vanilla = resolve_unit_price(&cake, "Large", "Vanilla", "Single Layer").unwrap();
        let chocolate = resolve_unit_price(&cake, "Large", "Chocolate", "Single Layer").unwrap();
        assert_eq!(vanilla, chocolate);
    }

    #[test]
    fn unknown_size_rejected() {
        let cake = sample_cake();
        let err = resolve_unit_price(&cake, "Mega", "Vanilla", "Single Layer").unwrap_err();
        assert_eq!(err, PricingError::UnknownSize("Mega".to_string()));
    }

    #[test]
    fn unknown_layer_rejected() {
        let cake = sample_cake();
        let err = resolve_unit_price(&cake, "Small", "Vanilla", "Triple Layer").unwrap_err();
        assert_eq!(err, PricingError::UnknownLayer("Triple Layer".to_string()));
    }

    #[test]
    fn volume_rate_steps() {
        assert_eq!(volume_discount_rate(1), Decimal::ZERO);
        assert_eq!(volume_discount_rate(2), Decimal::ZERO);
        assert_eq!(volume_discount_rate(3), Decimal::new(5, 2));
        assert_eq!(volume_discount_rate(4), Decimal::new(5, 2));
        assert_eq!(volume_discount_rate(5), Decimal::new(10, 2));
        assert_eq!(volume_discount_rate(9), Decimal::new(10, 2));
        assert_eq!(volume_discount_rate(10), Decimal::new(15, 2));
        assert_eq!(volume_discount_rate(100), Decimal::new(15, 2));
    }

    #[test]
    fn volume_rate_is_monotone_and_bounded() {
        let mut prev = Decimal::ZERO;
        for qty in 1..=50 {
            let rate = volume_discount_rate(qty);
            assert!(rate >= prev, "rate decreased at qty {}", qty);
            assert!(rate >= Decimal::ZERO && rate <= Decimal::new(15, 2));
            prev = rate;
        }
    }

    #[test]
    fn spec_worked_example() {
        // base 2000 + Medium 800 + Double Layer 500, qty 5
        // → unit 3300, rate 0.10, discounted unit round(2970) = 2970, line 14850
        let cake = sample_cake();
        let line = price_line(&cake, "Medium", "Vanilla", "Double Layer", 5).unwrap();
        assert_eq!(line.unit_price, 3300.0);
        assert_eq!(line.volume_rate, 0.10);
        assert_eq!(line.discounted_unit_price, 2970.0);
        assert_eq!(line.line_total, 14850.0);
    }

    #[test]
    fn rounding_happens_on_unit_price_not_line_total() {
        // unit 2505 at qty 3 → 2505 * 0.95 = 2379.75 → rounds to 2380
        // line = 2380 * 3 = 7140 (per-unit rounding), not round(7139.25) = 7139
        let mut cake = sample_cake();
        cake.base_price = 2505.0;
        let line = price_line(&cake, "Small", "Vanilla", "Single Layer", 3).unwrap();
        assert_eq!(line.discounted_unit_price, 2380.0);
        assert_eq!(line.line_total, 7140.0);
    }

    #[test]
    fn zero_quantity_rejected() {
        let cake = sample_cake();
        assert_eq!(
            price_line(&cake, "Small", "Vanilla", "Single Layer", 0).unwrap_err(),
            PricingError::InvalidQuantity(0)
        );
    }
}
