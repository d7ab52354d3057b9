//! Order-Level Price Calculator
//!
//! `total = subtotal + delivery_fee - discount`，全程 Decimal 计算。

use rust_decimal::prelude::*;

use super::calculator::{LinePricing, to_decimal, to_f64};

/// Result of order total calculation
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    /// Sum of all line totals
    pub subtotal: f64,
    pub delivery_fee: f64,
    /// Promo discount (already clamped to `[0, subtotal]`)
    pub discount: f64,
    /// subtotal + delivery_fee - discount
    pub total: f64,
}

/// Sum line totals into the order subtotal
pub fn sum_line_totals(lines: &[LinePricing]) -> f64 {
    let total = lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc + to_decimal(line.line_total));
    to_f64(total)
}

/// Compute the final order totals
///
/// `discount` 已在 promo 校验时夹到 `[0, subtotal]`，这里再保底一次，
/// 订单总额不可能为负。
pub fn calculate_order_totals(subtotal: f64, delivery_fee: f64, discount: f64) -> OrderTotals {
    let subtotal_dec = to_decimal(subtotal);
    let fee_dec = to_decimal(delivery_fee);
    let discount_dec = to_decimal(discount).max(Decimal::ZERO).min(subtotal_dec);

    let total = (subtotal_dec + fee_dec - discount_dec).max(Decimal::ZERO);

    OrderTotals {
        subtotal: to_f64(subtotal_dec),
        delivery_fee: to_f64(fee_dec),
        discount: to_f64(discount_dec),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_worked_example() {
        // subtotal 10000, delivery 500, FIXED 1000 → total 9500
        let totals = calculate_order_totals(10000.0, 500.0, 1000.0);
        assert_eq!(totals.total, 9500.0);
    }

    #[test]
    fn discount_clamped_to_subtotal() {
        let totals = calculate_order_totals(200.0, 500.0, 300.0);
        assert_eq!(totals.discount, 200.0);
        assert_eq!(totals.total, 500.0);
    }

    #[test]
    fn sum_of_lines() {
        let lines = vec![
            LinePricing {
                unit_price: 3300.0,
                volume_rate: 0.10,
                discounted_unit_price: 2970.0,
                line_total: 14850.0,
            },
            LinePricing {
                unit_price: 2000.0,
                volume_rate: 0.0,
                discounted_unit_price: 2000.0,
                line_total: 4000.0,
            },
        ];
        assert_eq!(sum_line_totals(&lines), 18850.0);
    }

    #[test]
    fn zero_discount_orders() {
        let totals = calculate_order_totals(4000.0, 500.0, 0.0);
        assert_eq!(totals.subtotal, 4000.0);
        assert_eq!(totals.delivery_fee, 500.0);
        assert_eq!(totals.total, 4500.0);
    }
}
