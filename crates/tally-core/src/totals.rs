//! # Order Totals Calculator
//!
//! Prices a batch of line items and derives the four header totals.
//!
//! ## Per-Line Math (all integer cents)
//! ```text
//! base       = unit_price × qty
//! discount   = base × discount_rate      (rounded half-up to a cent)
//! taxable    = base - discount
//! tax        = taxable × tax_rate        (rounded half-up to a cent)
//! line_total = taxable + tax
//! ```
//!
//! ## Aggregates
//! ```text
//! sub_total      = Σ base
//! discount_total = Σ discount
//! tax_total      = Σ tax
//! grand_total    = sub_total - discount_total + tax_total
//! ```
//!
//! ## Rounding Policy
//! Rounding happens exactly once, per line, when the discount and tax
//! amounts are derived. Aggregates are plain integer sums of the rounded
//! per-line amounts, so `Σ line_total == grand_total` holds exactly and
//! the lines always reconcile with the header.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Percent;
use crate::validation::{validate_price_cents, validate_quantity, validate_rate_bps, validate_uuid};
use crate::MAX_ORDER_LINES;

/// One submitted line, before pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    pub product_id: String,
    pub qty: i64,
    pub unit_price_cents: i64,
    pub discount: Percent,
    pub tax: Percent,
}

/// One line after pricing: the input plus every derived amount, ready
/// for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub qty: i64,
    pub unit_price_cents: i64,
    pub discount_bps: u32,
    pub tax_bps: u32,
    pub base_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub line_total_cents: i64,
}

/// The four derived header totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub sub_total_cents: i64,
    pub discount_total_cents: i64,
    pub tax_total_cents: i64,
    pub grand_total_cents: i64,
}

/// A fully priced order: lines plus aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
}

/// Prices a batch of line items.
///
/// Every line is validated before any is priced: an order with one bad
/// line is rejected whole, so callers never see partial results.
///
/// ## Errors
/// - [`CoreError::EmptyOrder`] for an empty batch
/// - [`CoreError::TooManyLines`] past [`MAX_ORDER_LINES`]
/// - [`CoreError::Validation`] for a non-positive quantity, negative
///   price, rate above 100%, or malformed product id
///
/// ## Example
/// ```rust
/// use tally_core::{price_lines, LineInput};
/// use tally_core::types::Percent;
///
/// let priced = price_lines(&[LineInput {
///     product_id: "550e8400-e29b-41d4-a716-446655440000".into(),
///     qty: 2,
///     unit_price_cents: 50000,
///     discount: Percent::from_percentage(10.0),
///     tax: Percent::from_percentage(5.0),
/// }])
/// .unwrap();
///
/// assert_eq!(priced.totals.grand_total_cents, 94500);
/// ```
pub fn price_lines(items: &[LineInput]) -> CoreResult<PricedOrder> {
    if items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    if items.len() > MAX_ORDER_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_ORDER_LINES,
        });
    }

    for item in items {
        validate_uuid("product_id", &item.product_id)?;
        validate_quantity(item.qty)?;
        validate_price_cents(item.unit_price_cents)?;
        validate_rate_bps("discount_pct", item.discount.bps())?;
        validate_rate_bps("tax_pct", item.tax.bps())?;
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut sub_total = Money::zero();
    let mut discount_total = Money::zero();
    let mut tax_total = Money::zero();

    for item in items {
        let base = Money::from_cents(item.unit_price_cents).times(item.qty);
        let discount = base.percent_of(item.discount);
        let taxable = base - discount;
        let tax = taxable.percent_of(item.tax);
        let line_total = taxable + tax;

        sub_total += base;
        discount_total += discount;
        tax_total += tax;

        lines.push(PricedLine {
            product_id: item.product_id.clone(),
            qty: item.qty,
            unit_price_cents: item.unit_price_cents,
            discount_bps: item.discount.bps(),
            tax_bps: item.tax.bps(),
            base_cents: base.cents(),
            discount_cents: discount.cents(),
            tax_cents: tax.cents(),
            line_total_cents: line_total.cents(),
        });
    }

    let grand_total = sub_total - discount_total + tax_total;

    Ok(PricedOrder {
        lines,
        totals: OrderTotals {
            sub_total_cents: sub_total.cents(),
            discount_total_cents: discount_total.cents(),
            tax_total_cents: tax_total.cents(),
            grand_total_cents: grand_total.cents(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid() -> String {
        "550e8400-e29b-41d4-a716-446655440000".to_string()
    }

    fn line(qty: i64, price: i64, discount_pct: f64, tax_pct: f64) -> LineInput {
        LineInput {
            product_id: pid(),
            qty,
            unit_price_cents: price,
            discount: Percent::from_percentage(discount_pct),
            tax: Percent::from_percentage(tax_pct),
        }
    }

    #[test]
    fn test_single_line_with_discount_and_tax() {
        // 500.00 × 2, 10% discount, 5% tax:
        // base 1000.00, discount 100.00, taxable 900.00, tax 45.00, total 945.00
        let priced = price_lines(&[line(2, 50000, 10.0, 5.0)]).unwrap();

        let l = &priced.lines[0];
        assert_eq!(l.base_cents, 100000);
        assert_eq!(l.discount_cents, 10000);
        assert_eq!(l.tax_cents, 4500);
        assert_eq!(l.line_total_cents, 94500);

        assert_eq!(priced.totals.sub_total_cents, 100000);
        assert_eq!(priced.totals.discount_total_cents, 10000);
        assert_eq!(priced.totals.tax_total_cents, 4500);
        assert_eq!(priced.totals.grand_total_cents, 94500);
    }

    #[test]
    fn test_two_plain_lines() {
        // 50000.00 × 1 plus 500.00 × 2, no discount, no tax: grand 51000.00
        let priced =
            price_lines(&[line(1, 5000000, 0.0, 0.0), line(2, 50000, 0.0, 0.0)]).unwrap();

        assert_eq!(priced.totals.sub_total_cents, 5100000);
        assert_eq!(priced.totals.discount_total_cents, 0);
        assert_eq!(priced.totals.tax_total_cents, 0);
        assert_eq!(priced.totals.grand_total_cents, 5100000);
    }

    #[test]
    fn test_grand_total_identity() {
        let priced = price_lines(&[
            line(3, 333, 7.5, 8.25),
            line(1, 19999, 12.0, 5.0),
            line(7, 101, 0.0, 18.0),
        ])
        .unwrap();

        let t = priced.totals;
        assert_eq!(
            t.grand_total_cents,
            t.sub_total_cents - t.discount_total_cents + t.tax_total_cents
        );
    }

    #[test]
    fn test_lines_reconcile_with_header_exactly() {
        // Per-line rounding only: the summed line totals equal the grand
        // total with zero drift, even on awkward rates.
        let priced = price_lines(&[
            line(1, 999, 3.33, 8.25),
            line(2, 4567, 1.11, 7.77),
            line(5, 89, 9.99, 12.5),
        ])
        .unwrap();

        let summed: i64 = priced.lines.iter().map(|l| l.line_total_cents).sum();
        assert_eq!(summed, priced.totals.grand_total_cents);
    }

    #[test]
    fn test_per_line_rounding() {
        // 0.99 at 8.25% tax = 0.0817 -> 0.08
        let priced = price_lines(&[line(1, 99, 0.0, 8.25)]).unwrap();
        assert_eq!(priced.lines[0].tax_cents, 8);
        assert_eq!(priced.lines[0].line_total_cents, 107);
    }

    #[test]
    fn test_free_item_prices_to_zero() {
        let priced = price_lines(&[line(3, 0, 10.0, 18.0)]).unwrap();
        assert_eq!(priced.totals.grand_total_cents, 0);
    }

    #[test]
    fn test_full_discount() {
        let priced = price_lines(&[line(2, 1000, 100.0, 5.0)]).unwrap();
        assert_eq!(priced.lines[0].discount_cents, 2000);
        assert_eq!(priced.lines[0].tax_cents, 0);
        assert_eq!(priced.totals.grand_total_cents, 0);
    }

    #[test]
    fn test_empty_order_rejected() {
        assert!(matches!(price_lines(&[]), Err(CoreError::EmptyOrder)));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(price_lines(&[line(0, 1000, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        assert!(price_lines(&[line(-2, 1000, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(price_lines(&[line(1, -5, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_rate_above_hundred_percent_rejected() {
        assert!(price_lines(&[line(1, 1000, 101.0, 0.0)]).is_err());
        assert!(price_lines(&[line(1, 1000, 0.0, 101.0)]).is_err());
    }

    #[test]
    fn test_one_bad_line_rejects_whole_batch() {
        let result = price_lines(&[line(1, 1000, 0.0, 0.0), line(0, 500, 0.0, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_too_many_lines_rejected() {
        let items: Vec<LineInput> = (0..=crate::MAX_ORDER_LINES)
            .map(|_| line(1, 100, 0.0, 0.0))
            .collect();
        assert!(matches!(
            price_lines(&items),
            Err(CoreError::TooManyLines { .. })
        ));
    }

    #[test]
    fn test_malformed_product_id_rejected() {
        let mut bad = line(1, 100, 0.0, 0.0);
        bad.product_id = "not-a-uuid".to_string();
        assert!(price_lines(&[bad]).is_err());
    }
}
