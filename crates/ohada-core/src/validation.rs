//! # Validation Module
//!
//! Scalar validators for amounts, quantities and rates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: SPA form (same rules, compiled to the client)                │
//! │  └── Immediate user feedback, NEVER trusted                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: REST handler (Rust)                                          │
//! │  ├── Rule sets over the whole record   (crate::rules)                  │
//! │  └── THIS MODULE: scalar amount / quantity / rate checks               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document invariants (crate::entry, crate::invoice)           │
//! │  └── Balance, single-sided lines, status machine                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ohada_core::validation::{is_valid_amount, validate_quantity, AmountBounds};
//! use serde_json::json;
//!
//! assert!(is_valid_amount(&json!(1500.5), &AmountBounds::default()));
//! assert!(!is_valid_amount(&json!(-1), &AmountBounds::default()));
//! assert!(validate_quantity(5).is_ok());
//! ```

use serde_json::Value;

use crate::error::ValidationError;
use crate::money::{parse_scaled, Money, ParseAmountError, Percent};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Amounts
// =============================================================================

/// Limits applied by [`validate_amount`].
///
/// The default matches form usage: `min = 0`, no maximum, negatives refused.
/// `allow_negative` alone does not lift `min`; use [`AmountBounds::signed`]
/// for amounts that may go below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountBounds {
    pub min: Option<Money>,
    pub max: Option<Money>,
    pub allow_negative: bool,
}

impl Default for AmountBounds {
    fn default() -> Self {
        AmountBounds {
            min: Some(Money::zero()),
            max: None,
            allow_negative: false,
        }
    }
}

impl AmountBounds {
    /// Any amount, negative included.
    pub fn signed() -> Self {
        AmountBounds {
            min: None,
            max: None,
            allow_negative: true,
        }
    }

    pub fn with_min(mut self, min: Money) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: Money) -> Self {
        self.max = Some(max);
        self
    }
}

/// Validates an amount and returns it as Money.
///
/// ## Rules (in order)
/// - Must be a JSON number or numeric string (NaN/infinite cannot be)
/// - Negative only if `allow_negative`
/// - Within `[min, max]`
pub fn validate_amount(value: &Value, bounds: &AmountBounds, field: &str) -> ValidationResult<Money> {
    let amount = Money::from_json(value).ok_or_else(|| ValidationError::NotANumber {
        field: field.to_string(),
    })?;

    check_bounds(amount, bounds, field)
}

/// Applies `bounds` to an amount that is already Money.
pub fn check_bounds(amount: Money, bounds: &AmountBounds, field: &str) -> ValidationResult<Money> {
    if amount.is_negative() && !bounds.allow_negative {
        return Err(ValidationError::NegativeNotAllowed {
            field: field.to_string(),
        });
    }

    if let Some(min) = bounds.min {
        if amount < min {
            return Err(ValidationError::BelowMinimum {
                field: field.to_string(),
                min: min.to_string(),
            });
        }
    }

    if let Some(max) = bounds.max {
        if amount > max {
            return Err(ValidationError::AboveMaximum {
                field: field.to_string(),
                max: max.to_string(),
            });
        }
    }

    Ok(amount)
}

/// Boolean form of [`validate_amount`].
pub fn is_valid_amount(value: &Value, bounds: &AmountBounds) -> bool {
    validate_amount(value, bounds, "Montant").is_ok()
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::NegativeNotAllowed {
            field: "Prix unitaire".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Quantities
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Invoice: Edit Line                                                     │
/// │                                                                         │
/// │  User enters quantity: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "Quantité doit être positif"              │
/// │       │                                                                 │
/// │       └── OK → line total recomputed                                   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantité".to_string(),
        });
    }

    Ok(())
}

/// Validates a raw quantity: a positive whole number, no fractional units.
///
/// Numbers and numeric strings are read the same way: `2`, `2.0`, `"2"`
/// and `"2,0"` are accepted; `2.5`, `"2.5"` and `"abc"` are not.
pub fn validate_quantity_value(value: &Value) -> ValidationResult<i64> {
    let field = || "Quantité".to_string();

    let qty = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64().ok_or_else(|| ValidationError::NotANumber { field: field() })?;
                if f.fract() != 0.0 {
                    return Err(ValidationError::NotAnInteger { field: field() });
                }
                if f < i64::MIN as f64 || f >= i64::MAX as f64 {
                    return Err(ValidationError::NotANumber { field: field() });
                }
                f as i64
            }
        },
        Value::String(s) => match parse_scaled(s, 0, false) {
            Ok(qty) => i64::try_from(qty).map_err(|_| ValidationError::NotANumber { field: field() })?,
            Err(ParseAmountError::TooManyDecimals { .. }) => {
                return Err(ValidationError::NotAnInteger { field: field() })
            }
            Err(_) => return Err(ValidationError::NotANumber { field: field() }),
        },
        _ => return Err(ValidationError::NotANumber { field: field() }),
    };

    validate_quantity(qty)?;
    Ok(qty)
}

// =============================================================================
// Rates
// =============================================================================

/// Validates a tax rate.
///
/// ## Rules
/// - Must be between 0 and 100%
/// - Senegal VAT is 18%, reduced rate 10%
pub fn validate_tax_rate(rate: Percent) -> ValidationResult<()> {
    validate_tax_rate_within(rate, Percent::hundred())
}

/// Validates a tax rate against a configured ceiling (`[tax] max_rate_bps`).
pub fn validate_tax_rate_within(rate: Percent, max: Percent) -> ValidationResult<()> {
    validate_rate(rate, max, "Taux de TVA")
}

/// Validates a discount percentage (0 to 100%).
pub fn validate_discount(rate: Percent) -> ValidationResult<()> {
    validate_rate(rate, Percent::hundred(), "Remise")
}

fn validate_rate(rate: Percent, max: Percent, field: &str) -> ValidationResult<()> {
    if rate.bps() < 0 {
        return Err(ValidationError::BelowMinimum {
            field: field.to_string(),
            min: "0%".to_string(),
        });
    }

    if rate > max {
        return Err(ValidationError::AboveMaximum {
            field: field.to_string(),
            max: max.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
