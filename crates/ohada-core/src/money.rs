//! # Money Module
//!
//! Provides the `Money`, `Percent` and `Factor` value types.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Rounding after every step only hides the drift:                       │
//! │    Σ debits == Σ credits becomes "within 0.01"                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (2 decimal places)                  │
//! │    10 + 20 cents = 30 cents, exactly, forever                          │
//! │    Decimal text appears only when parsing input or rendering output    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ohada_core::money::Money;
//!
//! let price: Money = "1 250,50".parse().unwrap();
//! assert_eq!(price.cents(), 125_050);
//!
//! let doubled = price * 2;
//! assert_eq!(doubled.to_string(), "2501.00");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

use crate::config::CurrencySettings;
use crate::DECIMAL_PLACES;

/// 10^DECIMAL_PLACES.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Parse Error
// =============================================================================

/// Why a decimal string could not become a scaled integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    Invalid(String),

    #[error("at most {max} decimal places are allowed")]
    TooManyDecimals { max: u32 },

    #[error("amount is out of range")]
    Overflow,
}

// =============================================================================
// Scaled Decimal Helpers
// =============================================================================

/// Divides and rounds half away from zero.
///
/// `den` must be non-zero; callers check.
pub(crate) fn div_round(num: i128, den: i128) -> i128 {
    let q = num / den;
    let r = num % den;
    if 2 * r.abs() >= den.abs() {
        if (num < 0) == (den < 0) {
            q + 1
        } else {
            q - 1
        }
    } else {
        q
    }
}

/// Clamps into i64 so arithmetic stays total.
pub(crate) fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Parses decimal text into an integer scaled by `10^scale`.
///
/// Accepts an optional sign, `.` or `,` as decimal separator, an optional
/// exponent (`1e3`, `2.5E-1`), and spaces, underscores, apostrophes or
/// (narrow) no-break spaces as digit grouping. With `round` set, extra
/// fraction digits are rounded half away from zero; otherwise they are an
/// error.
pub(crate) fn parse_scaled(input: &str, scale: u32, round: bool) -> Result<i128, ParseAmountError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '\'' | '\u{a0}' | '\u{202f}'))
        .collect();

    if cleaned.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let invalid = || ParseAmountError::Invalid(input.trim().to_string());

    let (negative, body) = match cleaned.as_bytes()[0] {
        b'-' => (true, &cleaned[1..]),
        b'+' => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => {
            let exponent = body[at + 1..].parse::<i32>().map_err(|_| invalid())?;
            (&body[..at], exponent as i64)
        }
        None => (body, 0),
    };

    let mut parts = mantissa.splitn(2, ['.', ',']);
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|c| c.is_ascii_digit()) || !frac_part.bytes().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let digits = format!("{}{}", int_part, frac_part);
    if digits.bytes().all(|d| d == b'0') {
        return Ok(0);
    }

    // Move the decimal point by the exponent. Beyond `scale + 2` places to
    // the right of the last kept digit, more zeros change nothing.
    let point = (int_part.len() as i64 + exponent).max(-(scale as i64 + 2));
    if point > 40 {
        return Err(ParseAmountError::Overflow);
    }
    let (int_digits, frac_digits) = if point <= 0 {
        (String::new(), format!("{}{}", "0".repeat((-point) as usize), digits))
    } else if point as usize >= digits.len() {
        (format!("{}{}", digits, "0".repeat(point as usize - digits.len())), String::new())
    } else {
        let (int_digits, frac_digits) = digits.split_at(point as usize);
        (int_digits.to_string(), frac_digits.to_string())
    };

    let int_digits = int_digits.trim_start_matches('0');
    // Guard before the i128 accumulator can overflow.
    if int_digits.len() > 30 {
        return Err(ParseAmountError::Overflow);
    }

    let mut value: i128 = 0;
    for digit in int_digits.bytes() {
        value = value * 10 + (digit - b'0') as i128;
    }

    let scale = scale as usize;
    let (kept, dropped) = if frac_digits.len() > scale {
        frac_digits.split_at(scale)
    } else {
        (frac_digits.as_str(), "")
    };

    for i in 0..scale {
        let digit = kept.as_bytes().get(i).map(|d| (d - b'0') as i128).unwrap_or(0);
        value = value * 10 + digit;
    }

    if dropped.bytes().any(|d| d != b'0') {
        if !round {
            return Err(ParseAmountError::TooManyDecimals { max: scale as u32 });
        }
        if dropped.as_bytes()[0] >= b'5' {
            value += 1;
        }
    }

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in minor units (cents, `DECIMAL_PLACES = 2`).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for credit notes and differences
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as cents**: The SPA divides by 100 for display only
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  InvoiceLine.unit_price ──► InvoiceLine.total ──► InvoiceTotals        │
/// │                                                                         │
/// │  EntryLine.debit / credit ──► BalanceSummary (Σ debit == Σ credit)     │
/// │                                                                         │
/// │  EVERY monetary value in the kernel flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(MINOR_PER_MAJOR).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(MINOR_PER_MAJOR).saturating_add(minor))
        }
    }

    /// Creates a whole amount (no minor units).
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a whole quantity.
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(saturate(self.0 as i128 * qty as i128))
    }

    /// Strict parse of user input; more than 2 decimals is an error.
    pub fn parse(input: &str) -> Result<Self, ParseAmountError> {
        let cents = parse_scaled(input, DECIMAL_PLACES, false)?;
        i64::try_from(cents)
            .map(Money)
            .map_err(|_| ParseAmountError::Overflow)
    }

    /// Lenient parse: rounds extra decimals, anything unparseable is zero.
    ///
    /// This is the "missing or non-numeric counts as 0" rule used when
    /// re-checking raw entry payloads.
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("12.345").cents(), 1235);
    /// assert_eq!(Money::parse_lenient("abc").cents(), 0);
    /// ```
    pub fn parse_lenient(input: &str) -> Self {
        parse_scaled(input, DECIMAL_PLACES, true)
            .ok()
            .and_then(|cents| i64::try_from(cents).ok())
            .map(Money)
            .unwrap_or_default()
    }

    /// Reads a JSON number or numeric string.
    ///
    /// Numbers are rounded to the cent (they were floats on the other side);
    /// strings go through the strict parser. Anything else, or an amount
    /// that does not fit in `i64` cents, is `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return i.checked_mul(MINOR_PER_MAJOR).map(Money);
                }
                let cents = (n.as_f64()? * MINOR_PER_MAJOR as f64).round();
                if !cents.is_finite() || cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
                    return None;
                }
                Some(Money(cents as i64))
            }
            Value::String(s) => Money::parse(s).ok(),
            _ => None,
        }
    }

    /// Renders with the configured separators and symbol.
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::config::CurrencySettings;
    /// use ohada_core::money::Money;
    ///
    /// let amount = Money::from_cents(123_456_789);
    /// assert_eq!(amount.format_with(&CurrencySettings::default()), "1 234 567,89 FCFA");
    /// ```
    pub fn format_with(&self, settings: &CurrencySettings) -> String {
        let digits = self.major().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&settings.thousands_separator);
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        let mut out = format!(
            "{}{}{}{:02}",
            sign,
            grouped,
            settings.decimal_separator,
            self.minor_part()
        );
        if !settings.symbol.is_empty() {
            out.push(' ');
            out.push_str(&settings.symbol);
        }
        out
    }
}

/// Plain decimal rendering (`-1234.50`), used in logs and error messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl FromStr for Money {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a whole quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A rate in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (Senegal VAT), 1250 bps = 12.5%
///
/// Signed, because margins and markups can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    /// Basis points in 100%.
    pub const SCALE: i64 = 10_000;

    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    /// Whole percent, e.g. `Percent::from_whole(18)`.
    #[inline]
    pub const fn from_whole(pct: i64) -> Self {
        Percent(pct.saturating_mul(100))
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as i64)
    }

    /// Parses `"18"`, `"12,5"`, `"7.25 %"`.
    pub fn parse(input: &str) -> Result<Self, ParseAmountError> {
        let trimmed = input.trim().trim_end_matches('%');
        let bps = parse_scaled(trimmed, 2, false)?;
        i64::try_from(bps)
            .map(Percent)
            .map_err(|_| ParseAmountError::Overflow)
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn hundred() -> Self {
        Percent(Self::SCALE)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / 100;
        let frac = abs % 100;
        if frac == 0 {
            write!(f, "{}{}%", sign, whole)
        } else if frac % 10 == 0 {
            write!(f, "{}{}.{}%", sign, whole, frac / 10)
        } else {
            write!(f, "{}{}.{:02}%", sign, whole, frac)
        }
    }
}

impl FromStr for Percent {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Percent::parse(s)
    }
}

// =============================================================================
// Factor
// =============================================================================

/// A decimal multiplier with 4 fraction digits (`1.5` is stored as 15000).
///
/// Used where an amount is scaled by something that is not a whole
/// quantity: exchange rates, pro-rata factors, generic multiply/divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Factor(i64);

impl Factor {
    pub const SCALE: i64 = 10_000;

    #[inline]
    pub const fn from_scaled(raw: i64) -> Self {
        Factor(raw)
    }

    #[inline]
    pub const fn from_int(n: i64) -> Self {
        Factor(n.saturating_mul(Self::SCALE))
    }

    pub fn parse(input: &str) -> Result<Self, ParseAmountError> {
        let raw = parse_scaled(input, 4, true)?;
        i64::try_from(raw)
            .map(Factor)
            .map_err(|_| ParseAmountError::Overflow)
    }

    #[inline]
    pub const fn raw(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Factor {
    fn from(n: i64) -> Self {
        Factor::from_int(n)
    }
}

impl From<i32> for Factor {
    fn from(n: i32) -> Self {
        Factor::from_int(n as i64)
    }
}

impl FromStr for Factor {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Factor::parse(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
        assert_eq!(Money::from_major(200).cents(), 20_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!(max.multiply_quantity(2).cents(), i64::MAX);
    }

    #[test]
    fn test_float_drift_is_impossible() {
        let a: Money = "0.10".parse().unwrap();
        let b: Money = "0.20".parse().unwrap();
        assert_eq!(a + b, "0.30".parse::<Money>().unwrap());
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(Money::parse("100").unwrap().cents(), 10_000);
        assert_eq!(Money::parse("100.5").unwrap().cents(), 10_050);
        assert_eq!(Money::parse("1 000,25").unwrap().cents(), 100_025);
        assert_eq!(Money::parse("-3.07").unwrap().cents(), -307);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("12.50").unwrap().cents(), 1250);
        assert_eq!(Money::parse("12.500").unwrap().cents(), 1250);

        assert_eq!(Money::parse(""), Err(ParseAmountError::Empty));
        assert_eq!(
            Money::parse("1.234"),
            Err(ParseAmountError::TooManyDecimals { max: 2 })
        );
        assert!(matches!(Money::parse("12a"), Err(ParseAmountError::Invalid(_))));
        assert!(matches!(Money::parse("-"), Err(ParseAmountError::Invalid(_))));
        assert!(matches!(Money::parse("1.2.3"), Err(ParseAmountError::Invalid(_))));
        assert_eq!(
            Money::parse("99999999999999999999999"),
            Err(ParseAmountError::Overflow)
        );
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Money::parse_lenient("12.345").cents(), 1235);
        assert_eq!(Money::parse_lenient("-12.345").cents(), -1235);
        assert_eq!(Money::parse_lenient("12.344").cents(), 1234);
        assert_eq!(Money::parse_lenient("").cents(), 0);
        assert_eq!(Money::parse_lenient("n/a").cents(), 0);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Money::from_json(&json!(100)), Some(Money::from_cents(10_000)));
        assert_eq!(Money::from_json(&json!(32.4)), Some(Money::from_cents(3240)));
        assert_eq!(
            Money::from_json(&json!(0.30000000000000004)),
            Some(Money::from_cents(30))
        );
        assert_eq!(Money::from_json(&json!("99.99")), Some(Money::from_cents(9999)));
        assert_eq!(Money::from_json(&json!("abc")), None);
        assert_eq!(Money::from_json(&json!(null)), None);
        assert_eq!(Money::from_json(&json!(true)), None);
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(Money::parse("1e3").unwrap().cents(), 100_000);
        assert_eq!(Money::parse("2.5E-1").unwrap().cents(), 25);
        assert_eq!(Money::parse("-1.5e+2").unwrap().cents(), -15_000);
        assert_eq!(Money::parse("0e400").unwrap().cents(), 0);
        assert_eq!(Money::parse("1e-2").unwrap().cents(), 1);
        assert_eq!(
            Money::parse("1e-3"),
            Err(ParseAmountError::TooManyDecimals { max: 2 })
        );
        assert_eq!(Money::parse("1e50"), Err(ParseAmountError::Overflow));
        assert!(matches!(Money::parse("e3"), Err(ParseAmountError::Invalid(_))));
        assert!(matches!(Money::parse("1e"), Err(ParseAmountError::Invalid(_))));

        assert_eq!(Money::parse_lenient("1e3").cents(), 100_000);
        assert_eq!(Money::parse_lenient("5e-3").cents(), 1);
        assert_eq!(Money::parse_lenient("1e-7").cents(), 0);
        assert_eq!(Money::parse_lenient("1e16").cents(), 100_000_000_000_000_000);
    }

    #[test]
    fn test_from_json_large_and_tiny_floats() {
        assert_eq!(
            Money::from_json(&json!(1e16)),
            Some(Money::from_cents(100_000_000_000_000_000))
        );
        assert_eq!(Money::from_json(&json!(1e-7)), Some(Money::zero()));
        assert_eq!(Money::from_json(&json!(-2.5e3)), Some(Money::from_cents(-250_000)));
        // 1e17 major units is 1e19 cents, past i64::MAX
        assert_eq!(Money::from_json(&json!(1e17)), None);
        assert_eq!(Money::from_json(&json!(u64::MAX)), None);
    }

    #[test]
    fn test_constructors_saturate() {
        assert_eq!(Money::from_major(i64::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_major(i64::MIN).cents(), i64::MIN);
        assert_eq!(Money::from_major_minor(i64::MIN / 10, 50).cents(), i64::MIN);
        assert_eq!(Percent::from_whole(i64::MAX).bps(), i64::MAX);
        assert_eq!(Factor::from_int(i64::MAX).raw(), i64::MAX);
    }

    #[test]
    fn test_format_with_settings() {
        let settings = CurrencySettings::default();
        assert_eq!(Money::from_cents(0).format_with(&settings), "0,00 FCFA");
        assert_eq!(Money::from_cents(99_999).format_with(&settings), "999,99 FCFA");
        assert_eq!(Money::from_cents(100_000).format_with(&settings), "1 000,00 FCFA");
        assert_eq!(
            Money::from_cents(-123_456_700).format_with(&settings),
            "-1 234 567,00 FCFA"
        );

        let plain = CurrencySettings {
            code: "EUR".to_string(),
            symbol: String::new(),
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
        };
        assert_eq!(Money::from_cents(123_456).format_with(&plain), "1,234.56");
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(21_240)).unwrap();
        assert_eq!(json, "21240");
    }

    #[test]
    fn test_div_round_half_away_from_zero() {
        assert_eq!(div_round(5, 10), 1);
        assert_eq!(div_round(4, 10), 0);
        assert_eq!(div_round(-5, 10), -1);
        assert_eq!(div_round(-4, 10), 0);
        assert_eq!(div_round(15, -10), -2);
        assert_eq!(div_round(20, 10), 2);
    }

    #[test]
    fn test_percent() {
        assert_eq!(Percent::from_whole(18).bps(), 1800);
        assert_eq!(Percent::from_percentage(8.25).bps(), 825);
        assert_eq!(Percent::parse("12,5").unwrap().bps(), 1250);
        assert_eq!(Percent::parse("7.25 %").unwrap().bps(), 725);
        assert!(Percent::parse("1.255").is_err());
        assert!((Percent::from_bps(825).percentage() - 8.25).abs() < 1e-9);

        assert_eq!(Percent::from_whole(18).to_string(), "18%");
        assert_eq!(Percent::from_bps(1250).to_string(), "12.5%");
        assert_eq!(Percent::from_bps(825).to_string(), "8.25%");
        assert_eq!(Percent::from_bps(-5000).to_string(), "-50%");
    }

    #[test]
    fn test_factor() {
        assert_eq!(Factor::from_int(2).raw(), 20_000);
        assert_eq!(Factor::parse("1.5").unwrap().raw(), 15_000);
        assert_eq!(Factor::parse("655.957").unwrap().raw(), 6_559_570);
        assert_eq!(Factor::parse("0.33333").unwrap().raw(), 3_333);
        assert!(Factor::from(0).is_zero());
    }
}
