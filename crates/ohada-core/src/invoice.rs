//! # Invoice Lines
//!
//! Invoice lines with a derived total, and a draft invoice whose totals are
//! kept in step with its lines.
//!
//! ## Derived Values
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_quantity(3) ──┐                                                    │
//! │                    ├──► line.total = quantity × unit_price              │
//! │  set_unit_price ───┘          │                                         │
//! │                               ▼                                         │
//! │  set_discount / set_tax_rate ─► invoice.totals (calculate_invoice_total)│
//! │                                                                         │
//! │  Neither total has a setter: it is never out of date.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

use crate::config::KernelConfig;
use crate::currency::{calculate_invoice_total, Billable, InvoiceTotals};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Percent};
use crate::validation::{
    check_bounds, validate_amount, validate_discount, validate_price, validate_quantity,
    validate_quantity_value, validate_tax_rate_within, AmountBounds, ValidationResult,
};

// =============================================================================
// Invoice Line
// =============================================================================

/// One billed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    description: String,
    quantity: i64,
    unit_price: Money,
    total: Money,
}

impl InvoiceLine {
    /// Creates a line; quantity must be positive and the price non-negative.
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::invoice::InvoiceLine;
    /// use ohada_core::money::Money;
    ///
    /// let mut line = InvoiceLine::new("Sac de ciment", 2, Money::from_major(4_500)).unwrap();
    /// assert_eq!(line.total(), Money::from_major(9_000));
    ///
    /// line.set_quantity(3).unwrap();
    /// assert_eq!(line.total(), Money::from_major(13_500));
    /// ```
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: Money) -> ValidationResult<Self> {
        validate_quantity(quantity)?;
        validate_price(unit_price)?;

        let mut line = InvoiceLine {
            description: description.into(),
            quantity,
            unit_price,
            total: Money::zero(),
        };
        line.recompute();
        Ok(line)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// On error the line is unchanged.
    pub fn set_quantity(&mut self, quantity: i64) -> ValidationResult<()> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        self.recompute();
        Ok(())
    }

    /// On error the line is unchanged.
    pub fn set_unit_price(&mut self, unit_price: Money) -> ValidationResult<()> {
        validate_price(unit_price)?;
        self.unit_price = unit_price;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.total = self.unit_price.multiply_quantity(self.quantity);
    }
}

impl Billable for InvoiceLine {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }

    fn line_total(&self) -> Money {
        self.total
    }
}

/// A line as posted by the SPA. Quantity and price may be numbers or
/// numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub unit_price: Value,
}

impl InvoiceLine {
    /// Builds a line from posted input, checking the unit price against
    /// `bounds` (see [`KernelConfig::amount_bounds`]).
    pub fn from_input(input: InvoiceLineInput, bounds: &AmountBounds) -> ValidationResult<Self> {
        let quantity = validate_quantity_value(&input.quantity)?;
        let unit_price = validate_amount(&input.unit_price, bounds, PRICE_LABEL)?;
        InvoiceLine::new(input.description.trim(), quantity, unit_price)
    }
}

impl TryFrom<InvoiceLineInput> for InvoiceLine {
    type Error = ValidationError;

    fn try_from(input: InvoiceLineInput) -> Result<Self, Self::Error> {
        InvoiceLine::from_input(input, &AmountBounds::default())
    }
}

const PRICE_LABEL: &str = "Prix unitaire";

// =============================================================================
// Invoice
// =============================================================================

/// Draft invoice: lines plus the rates applied to them.
///
/// Every mutation recomputes [`InvoiceTotals`]. The tax ceiling and unit
/// price bounds come from [`KernelConfig`] when built with
/// [`Invoice::with_config`]; they are not serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    lines: Vec<InvoiceLine>,
    discount: Percent,
    tax_rate: Percent,
    totals: InvoiceTotals,
    #[serde(skip)]
    #[ts(skip)]
    max_tax_rate: Percent,
    #[serde(skip)]
    #[ts(skip)]
    price_bounds: AmountBounds,
}

impl Invoice {
    /// Empty invoice with no discount, tax capped at 100%.
    pub fn new(tax_rate: Percent) -> ValidationResult<Self> {
        Self::with_limits(tax_rate, Percent::hundred(), AmountBounds::default())
    }

    /// Empty invoice at the configured default tax rate. Later tax rates are
    /// capped by `max_rate_bps` and unit prices by `max_amount_cents`.
    pub fn with_config(config: &KernelConfig) -> ValidationResult<Self> {
        Self::with_limits(config.tax_rate(), config.max_tax_rate(), config.amount_bounds())
    }

    fn with_limits(tax_rate: Percent, max_tax_rate: Percent, price_bounds: AmountBounds) -> ValidationResult<Self> {
        validate_tax_rate_within(tax_rate, max_tax_rate)?;
        Ok(Invoice {
            lines: Vec::new(),
            discount: Percent::zero(),
            tax_rate,
            totals: InvoiceTotals::default(),
            max_tax_rate,
            price_bounds,
        })
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn discount(&self) -> Percent {
        self.discount
    }

    pub fn tax_rate(&self) -> Percent {
        self.tax_rate
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    /// Appends a line and returns its index.
    pub fn add_line(&mut self, line: InvoiceLine) -> ValidationResult<usize> {
        check_bounds(line.unit_price(), &self.price_bounds, PRICE_LABEL)?;
        self.lines.push(line);
        self.recompute();
        Ok(self.lines.len() - 1)
    }

    /// Appends a posted line, read with this invoice's price bounds.
    pub fn add_line_input(&mut self, input: InvoiceLineInput) -> ValidationResult<usize> {
        let line = InvoiceLine::from_input(input, &self.price_bounds)?;
        self.add_line(line)
    }

    pub fn remove_line(&mut self, index: usize) -> CoreResult<InvoiceLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound(index));
        }
        let line = self.lines.remove(index);
        self.recompute();
        Ok(line)
    }

    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        self.line_mut(index)?.set_quantity(quantity)?;
        self.recompute();
        Ok(())
    }

    pub fn set_unit_price(&mut self, index: usize, unit_price: Money) -> CoreResult<()> {
        check_bounds(unit_price, &self.price_bounds, PRICE_LABEL)?;
        self.line_mut(index)?.set_unit_price(unit_price)?;
        self.recompute();
        Ok(())
    }

    pub fn set_discount(&mut self, discount: Percent) -> ValidationResult<()> {
        validate_discount(discount)?;
        self.discount = discount;
        self.recompute();
        Ok(())
    }

    pub fn set_tax_rate(&mut self, tax_rate: Percent) -> ValidationResult<()> {
        validate_tax_rate_within(tax_rate, self.max_tax_rate)?;
        self.tax_rate = tax_rate;
        self.recompute();
        Ok(())
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut InvoiceLine> {
        self.lines.get_mut(index).ok_or(CoreError::LineNotFound(index))
    }

    fn recompute(&mut self) {
        self.totals = calculate_invoice_total(self.lines.as_slice(), self.discount, self.tax_rate);
        debug!(lines = self.lines.len(), total = %self.totals.total, "Invoice recomputed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn m(major: i64) -> Money {
        Money::from_major(major)
    }

    #[test]
    fn test_line_total_follows_edits() {
        let mut line = InvoiceLine::new("Riz", 2, Money::from_cents(1_250)).unwrap();
        assert_eq!(line.total(), Money::from_cents(2_500));

        line.set_unit_price(Money::from_cents(1_999)).unwrap();
        assert_eq!(line.total(), Money::from_cents(3_998));

        line.set_quantity(10).unwrap();
        assert_eq!(line.total(), Money::from_cents(19_990));
    }

    #[test]
    fn test_line_rejects_bad_values() {
        assert!(InvoiceLine::new("Riz", 0, m(10)).is_err());
        assert!(InvoiceLine::new("Riz", 1, m(-10)).is_err());

        let mut line = InvoiceLine::new("Riz", 2, m(10)).unwrap();
        assert!(line.set_quantity(-1).is_err());
        assert!(line.set_unit_price(m(-1)).is_err());
        assert_eq!((line.quantity(), line.total()), (2, m(20)));
    }

    #[test]
    fn test_line_from_input() {
        let input: InvoiceLineInput = serde_json::from_value(json!({
            "description": " Huile 5L ",
            "quantity": "4",
            "unitPrice": "6 250,50"
        }))
        .unwrap();
        let line = InvoiceLine::try_from(input).unwrap();
        assert_eq!(line.description(), "Huile 5L");
        assert_eq!(line.total(), Money::from_cents(2_500_200));

        let input: InvoiceLineInput =
            serde_json::from_value(json!({ "quantity": 1.5, "unitPrice": 10 })).unwrap();
        assert_eq!(
            InvoiceLine::try_from(input),
            Err(ValidationError::NotAnInteger {
                field: "Quantité".to_string()
            })
        );

        let input: InvoiceLineInput = serde_json::from_value(json!({ "quantity": 1 })).unwrap();
        assert!(matches!(
            InvoiceLine::try_from(input),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_invoice_totals() {
        let mut invoice = Invoice::new(Percent::from_whole(18)).unwrap();
        invoice.add_line(InvoiceLine::new("Article", 2, m(100)).unwrap()).unwrap();
        invoice.set_discount(Percent::from_whole(10)).unwrap();

        let totals = invoice.totals();
        assert_eq!(totals.subtotal, m(200));
        assert_eq!(totals.discount_amount, m(20));
        assert_eq!(totals.taxable_amount, m(180));
        assert_eq!(totals.tax_amount, Money::from_cents(3_240));
        assert_eq!(totals.total, Money::from_cents(21_240));
    }

    #[test]
    fn test_invoice_recomputes_on_every_edit() {
        let mut invoice = Invoice::with_config(&KernelConfig::default()).unwrap();
        assert_eq!(invoice.tax_rate(), Percent::from_whole(18));
        assert_eq!(*invoice.totals(), InvoiceTotals::default());

        let first = invoice.add_line(InvoiceLine::new("A", 1, m(1_000)).unwrap()).unwrap();
        invoice.add_line(InvoiceLine::new("B", 3, m(500)).unwrap()).unwrap();
        assert_eq!(invoice.totals().subtotal, m(2_500));

        invoice.set_quantity(first, 2).unwrap();
        assert_eq!(invoice.totals().subtotal, m(3_500));

        invoice.set_unit_price(1, m(100)).unwrap();
        assert_eq!(invoice.totals().subtotal, m(2_300));

        invoice.set_tax_rate(Percent::zero()).unwrap();
        assert_eq!(invoice.totals().total, m(2_300));

        invoice.remove_line(first).unwrap();
        assert_eq!(invoice.totals().subtotal, m(300));
        assert_eq!(invoice.lines().len(), 1);
    }

    #[test]
    fn test_invoice_errors() {
        let mut invoice = Invoice::new(Percent::from_whole(18)).unwrap();
        assert!(Invoice::new(Percent::from_whole(101)).is_err());
        assert!(invoice.set_discount(Percent::from_whole(120)).is_err());
        assert_eq!(invoice.discount(), Percent::zero());
        assert_eq!(invoice.remove_line(0), Err(CoreError::LineNotFound(0)));
        assert_eq!(invoice.set_quantity(2, 1), Err(CoreError::LineNotFound(2)));

        invoice.add_line(InvoiceLine::new("A", 1, m(10)).unwrap()).unwrap();
        assert!(matches!(
            invoice.set_quantity(0, 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert_eq!(invoice.totals().subtotal, m(10));
    }

    #[test]
    fn test_configured_limits_apply() {
        let mut config = KernelConfig::default();
        config.tax.max_rate_bps = 2_000;
        config.validation.max_amount_cents = Some(100_000);

        let mut invoice = Invoice::with_config(&config).unwrap();
        assert_eq!(
            invoice.set_tax_rate(Percent::from_whole(25)),
            Err(ValidationError::AboveMaximum {
                field: "Taux de TVA".to_string(),
                max: "20%".to_string()
            })
        );
        assert_eq!(invoice.tax_rate(), Percent::from_whole(18));
        invoice.set_tax_rate(Percent::from_whole(20)).unwrap();

        assert!(matches!(
            invoice.add_line(InvoiceLine::new("Groupe électrogène", 1, m(1_500)).unwrap()),
            Err(ValidationError::AboveMaximum { .. })
        ));
        let index = invoice.add_line(InvoiceLine::new("Câble", 2, m(1_000)).unwrap()).unwrap();
        assert!(matches!(
            invoice.set_unit_price(index, m(1_000) + Money::from_cents(1)),
            Err(CoreError::Validation(ValidationError::AboveMaximum { .. }))
        ));

        let input: InvoiceLineInput =
            serde_json::from_value(json!({ "quantity": 1, "unitPrice": "2000" })).unwrap();
        assert!(invoice.add_line_input(input).is_err());
        assert_eq!(invoice.lines().len(), 1);
        assert_eq!(invoice.totals().subtotal, m(2_000));

        // Without a configured cap the same price is fine
        let mut unbounded = Invoice::new(Percent::from_whole(25)).unwrap();
        unbounded
            .add_line(InvoiceLine::new("Groupe électrogène", 1, m(1_500)).unwrap())
            .unwrap();
    }

    #[test]
    fn test_invoice_serialization() {
        let mut invoice = Invoice::new(Percent::from_whole(18)).unwrap();
        invoice.add_line(InvoiceLine::new("A", 2, m(100)).unwrap()).unwrap();
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["taxRate"], 1800);
        assert_eq!(json["lines"][0]["unitPrice"], 10_000);
        assert_eq!(json["lines"][0]["total"], 20_000);
        assert_eq!(json["totals"]["total"], 23_600);
    }
}
