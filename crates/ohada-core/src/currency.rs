//! # Monetary Arithmetic
//!
//! Deterministic arithmetic over [`Money`]. Every operation that can produce
//! a fraction of a cent rounds exactly once, half away from zero.
//!
//! ## Invoice Total Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Lines: 2 × 100.00                                                      │
//! │      │                                                                  │
//! │      ▼  (1) subtotal       = Σ quantity × unit_price       200.00       │
//! │      ▼  (2) discount       = 10% of subtotal                20.00       │
//! │      ▼  (3) taxable        = subtotal − discount           180.00       │
//! │      ▼  (4) tax (TVA 18%)  = 18% of taxable                 32.40       │
//! │      ▼  (5) total          = taxable + tax                 212.40       │
//! │                                                                         │
//! │  Discount BEFORE tax: tax is always computed on the discounted base.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::{div_round, saturate, Factor, Money, Percent};

// =============================================================================
// Basic Operations
// =============================================================================

#[inline]
pub fn add(a: Money, b: Money) -> Money {
    a + b
}

#[inline]
pub fn subtract(a: Money, b: Money) -> Money {
    a - b
}

/// Multiplies by a decimal factor, rounded to the cent.
///
/// ## Example
/// ```rust
/// use ohada_core::currency::multiply;
/// use ohada_core::money::{Factor, Money};
///
/// let amount = Money::from_cents(1000);
/// assert_eq!(multiply(amount, 3).cents(), 3000);
/// assert_eq!(multiply(amount, "0.3333".parse::<Factor>().unwrap()).cents(), 333);
/// ```
pub fn multiply(amount: Money, factor: impl Into<Factor>) -> Money {
    let factor = factor.into();
    Money::from_cents(saturate(div_round(
        amount.cents() as i128 * factor.raw() as i128,
        Factor::SCALE as i128,
    )))
}

/// Divides by a decimal factor, rounded to the cent.
///
/// Returns `None` for a zero divisor.
pub fn divide(amount: Money, divisor: impl Into<Factor>) -> Option<Money> {
    let divisor = divisor.into();
    if divisor.is_zero() {
        return None;
    }
    Some(Money::from_cents(saturate(div_round(
        amount.cents() as i128 * Factor::SCALE as i128,
        divisor.raw() as i128,
    ))))
}

/// Splits an amount into `parts` shares that add up exactly.
///
/// Leftover cents go to the first shares, so no cent is lost the way
/// `divide(amount, 3) * 3` loses one.
///
/// ## Example
/// ```rust
/// use ohada_core::currency::split;
/// use ohada_core::money::Money;
///
/// let shares = split(Money::from_cents(1000), 3);
/// assert_eq!(shares, vec![Money::from_cents(334), Money::from_cents(333), Money::from_cents(333)]);
/// ```
pub fn split(amount: Money, parts: usize) -> Vec<Money> {
    if parts == 0 {
        return Vec::new();
    }

    let n = parts as i64;
    let base = amount.cents() / n;
    let remainder = amount.cents() % n;
    let step = remainder.signum();

    (0..n)
        .map(|i| {
            if i < remainder.abs() {
                Money::from_cents(base + step)
            } else {
                Money::from_cents(base)
            }
        })
        .collect()
}

// =============================================================================
// Percentages, Discounts, Taxes
// =============================================================================

/// `amount × pct / 100`, rounded.
pub fn calculate_percentage(amount: Money, pct: Percent) -> Money {
    Money::from_cents(saturate(div_round(
        amount.cents() as i128 * pct.bps() as i128,
        Percent::SCALE as i128,
    )))
}

/// Amount left after removing `pct` percent.
pub fn apply_discount(amount: Money, pct: Percent) -> Money {
    amount - calculate_percentage(amount, pct)
}

/// Tax due on a tax-exclusive amount.
///
/// ## Example
/// ```rust
/// use ohada_core::currency::calculate_tax;
/// use ohada_core::money::{Money, Percent};
///
/// let tax = calculate_tax(Money::from_cents(18_000), Percent::from_whole(18));
/// assert_eq!(tax.cents(), 3_240);
/// ```
pub fn calculate_tax(amount: Money, rate: Percent) -> Money {
    calculate_percentage(amount, rate)
}

/// Tax-exclusive → tax-inclusive.
pub fn add_tax(amount: Money, rate: Percent) -> Money {
    amount + calculate_tax(amount, rate)
}

/// Tax-inclusive → tax-exclusive: `amount / (1 + rate/100)`, rounded.
///
/// `add_tax(remove_tax(x, r), r)` is within one cent of `x` for rates in
/// 0..=100%. A rate of -100% or below has no inverse; the amount is
/// returned unchanged.
pub fn remove_tax(amount: Money, rate: Percent) -> Money {
    let divisor = Percent::SCALE as i128 + rate.bps() as i128;
    if divisor <= 0 {
        return amount;
    }
    Money::from_cents(saturate(div_round(
        amount.cents() as i128 * Percent::SCALE as i128,
        divisor,
    )))
}

// =============================================================================
// Margins
// =============================================================================

/// Profit margin on the selling price: `(selling − cost) / selling × 100`.
///
/// Zero when the selling price is zero.
pub fn calculate_profit_margin(cost: Money, selling: Money) -> Percent {
    ratio_bps(selling - cost, selling)
}

/// Markup on cost: `(selling − cost) / cost × 100`.
///
/// Zero when the cost is zero.
pub fn calculate_markup(cost: Money, selling: Money) -> Percent {
    ratio_bps(selling - cost, cost)
}

fn ratio_bps(numerator: Money, denominator: Money) -> Percent {
    if denominator.is_zero() {
        return Percent::zero();
    }
    Percent::from_bps(saturate(div_round(
        numerator.cents() as i128 * Percent::SCALE as i128,
        denominator.cents() as i128,
    )))
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Anything that has a quantity and a unit price.
pub trait Billable {
    fn quantity(&self) -> i64;

    fn unit_price(&self) -> Money;

    /// Line product, computed (and rounded, if ever needed) per line.
    fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity())
    }
}

impl Billable for (i64, Money) {
    fn quantity(&self) -> i64 {
        self.0
    }

    fn unit_price(&self) -> Money {
        self.1
    }
}

/// Result of [`calculate_invoice_total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub taxable_amount: Money,
    pub tax_amount: Money,
    pub total: Money,
}

/// Computes invoice totals in the fixed order: subtotal, discount, taxable
/// base, tax, total.
///
/// ## Example
/// ```rust
/// use ohada_core::currency::calculate_invoice_total;
/// use ohada_core::money::{Money, Percent};
///
/// let items = [(2i64, Money::from_major(100))];
/// let totals = calculate_invoice_total(&items, Percent::from_whole(10), Percent::from_whole(18));
///
/// assert_eq!(totals.subtotal, Money::from_major(200));
/// assert_eq!(totals.discount_amount, Money::from_major(20));
/// assert_eq!(totals.taxable_amount, Money::from_major(180));
/// assert_eq!(totals.tax_amount, Money::from_cents(3_240));
/// assert_eq!(totals.total, Money::from_cents(21_240));
/// ```
pub fn calculate_invoice_total<B: Billable>(
    items: &[B],
    discount_pct: Percent,
    tax_rate: Percent,
) -> InvoiceTotals {
    let subtotal: Money = items.iter().map(Billable::line_total).sum();
    let discount_amount = calculate_percentage(subtotal, discount_pct);
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = calculate_tax(taxable_amount, tax_rate);
    let total = taxable_amount + tax_amount;

    debug!(
        lines = items.len(),
        subtotal = %subtotal,
        discount = %discount_amount,
        tax = %tax_amount,
        total = %total,
        "Invoice totals computed"
    );

    InvoiceTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
