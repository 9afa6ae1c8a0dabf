//! # Accounting Entries
//!
//! Journal entries, their single-sided lines, the balance check and the
//! status machine.
//!
//! ## Entry Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐   validate()                      ┌───────────┐           │
//! │   │  DRAFT  │ ─────────────────────────────────►│ VALIDATED │ terminal  │
//! │   └─────────┘   guard: ≥ 1 line                 └───────────┘           │
//! │        │               header rule set passes                           │
//! │        │               Σ debit == Σ credit                              │
//! │        │                                                                │
//! │        │ cancel()                               ┌───────────┐           │
//! │        └───────────────────────────────────────►│ CANCELLED │ terminal  │
//! │                                                 └───────────┘           │
//! │                                                                         │
//! │   Drafts may be unbalanced while being edited; the guard only blocks   │
//! │   the transition. Non-draft entries are read-only.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single-Sided Lines
//! A line is either a debit or a credit. Setting one side to a positive
//! amount zeroes the other in the same call, so no line can ever be observed
//! with both sides non-zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::formats::{self, Format};
use crate::money::{parse_scaled, saturate, Money, ParseAmountError};
use crate::rules::{Record, ValidationReport};
use crate::schemas;
use crate::validation::{validate_amount, AmountBounds, ValidationResult};
use crate::DECIMAL_PLACES;

/// Debits and credits closer than this are balanced (one cent, so exact).
pub const BALANCE_TOLERANCE: Money = Money::from_cents(1);

// =============================================================================
// Entry Side
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    Debit,
    Credit,
}

impl EntrySide {
    pub fn opposite(&self) -> Self {
        match self {
            EntrySide::Debit => EntrySide::Credit,
            EntrySide::Credit => EntrySide::Debit,
        }
    }
}

impl fmt::Display for EntrySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySide::Debit => write!(f, "debit"),
            EntrySide::Credit => write!(f, "credit"),
        }
    }
}

// =============================================================================
// Entry Status
// =============================================================================

/// The status of an accounting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being edited; may be unbalanced.
    #[default]
    Draft,
    /// Balanced and accepted.
    Validated,
    /// Abandoned.
    Cancelled,
}

impl EntryStatus {
    /// Only `draft → validated` and `draft → cancelled` exist.
    pub fn can_transition_to(&self, to: EntryStatus) -> bool {
        matches!(
            (self, to),
            (EntryStatus::Draft, EntryStatus::Validated) | (EntryStatus::Draft, EntryStatus::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EntryStatus::Draft)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Draft => write!(f, "draft"),
            EntryStatus::Validated => write!(f, "validated"),
            EntryStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "brouillon" => Ok(EntryStatus::Draft),
            "validated" | "validee" | "validée" => Ok(EntryStatus::Validated),
            "cancelled" | "canceled" | "annulee" | "annulée" => Ok(EntryStatus::Cancelled),
            other => Err(format!(
                "Unknown entry status: '{}'. Valid options: draft, validated, cancelled",
                other
            )),
        }
    }
}

// =============================================================================
// Entry Line
// =============================================================================

/// One line of an accounting entry.
///
/// Amounts are private: the only way to change them is [`set_amount`]
/// (or its two shorthands), which keeps the line single-sided.
///
/// [`set_amount`]: AccountingEntryLine::set_amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountingEntryLine {
    account_code: String,
    account_name: String,
    description: String,
    debit: Money,
    credit: Money,
}

impl AccountingEntryLine {
    /// A line with both sides at zero.
    pub fn new(account_code: impl Into<String>, account_name: impl Into<String>) -> Self {
        AccountingEntryLine {
            account_code: account_code.into(),
            account_name: account_name.into(),
            description: String::new(),
            debit: Money::zero(),
            credit: Money::zero(),
        }
    }

    /// A debit line.
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::entry::AccountingEntryLine;
    /// use ohada_core::money::Money;
    ///
    /// let line = AccountingEntryLine::debiting("601", "Achats", Money::from_major(100)).unwrap();
    /// assert_eq!(line.debit(), Money::from_major(100));
    /// assert!(line.credit().is_zero());
    /// ```
    pub fn debiting(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        amount: Money,
    ) -> ValidationResult<Self> {
        let mut line = Self::new(account_code, account_name);
        line.set_debit(amount)?;
        Ok(line)
    }

    /// A credit line.
    pub fn crediting(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        amount: Money,
    ) -> ValidationResult<Self> {
        let mut line = Self::new(account_code, account_name);
        line.set_credit(amount)?;
        Ok(line)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets one side of the line.
    ///
    /// A positive amount zeroes the opposite side in the same update; zero
    /// only clears this side. Negative amounts are refused and leave the line
    /// untouched.
    ///
    /// ```text
    /// { debit: 0,  credit: 30 }  ──set_amount(Debit, 50)──►  { debit: 50, credit: 0 }
    /// { debit: 50, credit: 0  }  ──set_amount(Debit, 0)───►  { debit: 0,  credit: 0 }
    /// ```
    pub fn set_amount(&mut self, side: EntrySide, amount: Money) -> ValidationResult<()> {
        if amount.is_negative() {
            return Err(ValidationError::NegativeNotAllowed {
                field: side_label(side).to_string(),
            });
        }

        let (this, other) = match side {
            EntrySide::Debit => (&mut self.debit, &mut self.credit),
            EntrySide::Credit => (&mut self.credit, &mut self.debit),
        };
        *this = amount;
        if amount.is_positive() {
            *other = Money::zero();
        }
        Ok(())
    }

    pub fn set_debit(&mut self, amount: Money) -> ValidationResult<()> {
        self.set_amount(EntrySide::Debit, amount)
    }

    pub fn set_credit(&mut self, amount: Money) -> ValidationResult<()> {
        self.set_amount(EntrySide::Credit, amount)
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn account_code(&self) -> &str {
        &self.account_code
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn debit(&self) -> Money {
        self.debit
    }

    pub fn credit(&self) -> Money {
        self.credit
    }

    /// The side carrying an amount, if any.
    pub fn side(&self) -> Option<EntrySide> {
        if self.debit.is_positive() {
            Some(EntrySide::Debit)
        } else if self.credit.is_positive() {
            Some(EntrySide::Credit)
        } else {
            None
        }
    }

    /// The non-zero amount, whichever side it is on.
    pub fn amount(&self) -> Money {
        self.debit + self.credit
    }
}

fn side_label(side: EntrySide) -> &'static str {
    match side {
        EntrySide::Debit => "Débit",
        EntrySide::Credit => "Crédit",
    }
}

/// A line as posted by the SPA, before any check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryLineInput {
    pub account_code: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub debit: Value,
    #[serde(default)]
    pub credit: Value,
}

impl TryFrom<EntryLineInput> for AccountingEntryLine {
    type Error = ValidationError;

    fn try_from(input: EntryLineInput) -> Result<Self, Self::Error> {
        let account_code = input.account_code.trim();
        if !formats::is_valid_account_code(account_code) {
            return Err(ValidationError::InvalidFormat {
                field: "Compte".to_string(),
                reason: Format::AccountCode.hint().to_string(),
            });
        }

        let debit = input_amount(&input.debit, EntrySide::Debit)?;
        let credit = input_amount(&input.credit, EntrySide::Credit)?;
        if debit.is_positive() && credit.is_positive() {
            return Err(ValidationError::Custom {
                message: "Une ligne ne peut pas être à la fois au débit et au crédit".to_string(),
            });
        }

        let mut line = AccountingEntryLine::new(account_code, input.account_name.trim());
        line.description = input.description.trim().to_string();
        line.set_debit(debit)?;
        line.set_credit(credit)?;
        Ok(line)
    }
}

/// Missing or blank is zero; anything else must be a non-negative amount.
fn input_amount(value: &Value, side: EntrySide) -> ValidationResult<Money> {
    match value {
        Value::Null => Ok(Money::zero()),
        Value::String(s) if s.trim().is_empty() => Ok(Money::zero()),
        other => validate_amount(other, &AmountBounds::default(), side_label(side)),
    }
}

// =============================================================================
// Balance Check
// =============================================================================

/// Totals of an entry and whether they agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_debit: Money,
    pub total_credit: Money,
    /// `total_debit - total_credit`.
    pub difference: Money,
    pub is_balanced: bool,
}

impl BalanceSummary {
    pub fn from_totals(total_debit: Money, total_credit: Money) -> Self {
        Self::from_sums(total_debit.cents() as i128, total_credit.cents() as i128)
    }

    /// Totals past `i64` are displayed saturated, but the verdict is taken
    /// on the exact sums so two different huge totals never compare equal.
    fn from_sums(total_debit: i128, total_credit: i128) -> Self {
        let difference = total_debit - total_credit;
        BalanceSummary {
            total_debit: Money::from_cents(saturate(total_debit)),
            total_credit: Money::from_cents(saturate(total_credit)),
            difference: Money::from_cents(saturate(difference)),
            is_balanced: difference.abs() < BALANCE_TOLERANCE.cents() as i128,
        }
    }
}

/// Sums the debits and credits of `lines`.
///
/// ## Example
/// ```rust
/// use ohada_core::entry::{check_balance, AccountingEntryLine};
/// use ohada_core::money::Money;
///
/// let lines = [
///     AccountingEntryLine::debiting("601", "Achats", Money::from_major(100)).unwrap(),
///     AccountingEntryLine::crediting("401", "Fournisseurs", Money::from_major(99)).unwrap(),
/// ];
/// let summary = check_balance(&lines);
/// assert!(!summary.is_balanced);
/// assert_eq!(summary.difference, Money::from_major(1));
/// ```
pub fn check_balance(lines: &[AccountingEntryLine]) -> BalanceSummary {
    let total_debit: i128 = lines.iter().map(|line| line.debit().cents() as i128).sum();
    let total_credit: i128 = lines.iter().map(|line| line.credit().cents() as i128).sum();
    BalanceSummary::from_sums(total_debit, total_credit)
}

/// Balance of raw line payloads, re-checked server side.
///
/// Each `debit`/`credit` is read leniently: missing, null or non-numeric
/// counts as zero, extra decimals are rounded to the cent, exponents such as
/// `1e3` are honoured.
pub fn check_balance_raw(lines: &[Value]) -> BalanceSummary {
    let mut total_debit: i128 = 0;
    let mut total_credit: i128 = 0;

    for line in lines {
        total_debit += lenient_amount(line.get("debit"));
        total_credit += lenient_amount(line.get("credit"));
    }

    let summary = BalanceSummary::from_sums(total_debit, total_credit);
    debug!(
        lines = lines.len(),
        debit = %summary.total_debit,
        credit = %summary.total_credit,
        balanced = summary.is_balanced,
        "Raw entry balance checked"
    );
    summary
}

/// Cents of one raw amount. Out-of-range values keep their magnitude
/// (clamped to ±1e36 cents) instead of collapsing to zero.
fn lenient_amount(value: Option<&Value>) -> i128 {
    const LIMIT: f64 = 1e36;

    let from_float = |f: f64| -> i128 {
        if f.is_finite() {
            (f * 100.0).round().clamp(-LIMIT, LIMIT) as i128
        } else {
            0
        }
    };

    match value {
        Some(Value::String(s)) => match parse_scaled(s, DECIMAL_PLACES, true) {
            Ok(cents) => cents,
            Err(ParseAmountError::Overflow) => s.trim().parse::<f64>().map(from_float).unwrap_or(0),
            Err(_) => 0,
        },
        Some(Value::Number(n)) => match n.as_i64() {
            Some(major) => major as i128 * 100,
            None => n.as_f64().map(from_float).unwrap_or(0),
        },
        _ => 0,
    }
}

// =============================================================================
// Accounting Entry
// =============================================================================

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountingEntry {
    /// Unique identifier (UUID v4).
    id: String,

    #[ts(as = "String")]
    date: NaiveDate,

    reference: String,
    description: String,

    /// Journal code (VE, AC, BQ, CA, OD...).
    journal: String,

    status: EntryStatus,
    lines: Vec<AccountingEntryLine>,
}

/// An entry as posted by the SPA.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    pub date: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub lines: Vec<EntryLineInput>,
}

impl AccountingEntry {
    /// Creates an empty draft.
    pub fn new(
        date: NaiveDate,
        reference: impl Into<String>,
        description: impl Into<String>,
        journal: impl Into<String>,
    ) -> Self {
        AccountingEntry {
            id: Uuid::new_v4().to_string(),
            date,
            reference: reference.into(),
            description: description.into(),
            journal: journal.into(),
            status: EntryStatus::Draft,
            lines: Vec::new(),
        }
    }

    /// Builds a draft from a posted payload.
    ///
    /// Only the date and each line are checked here; header rules and
    /// balance are checked by [`AccountingEntry::validate`].
    pub fn from_input(input: EntryInput) -> CoreResult<Self> {
        let date = formats::parse_iso_date(&input.date).ok_or_else(|| ValidationError::InvalidFormat {
            field: "Date".to_string(),
            reason: Format::Date.hint().to_string(),
        })?;

        let mut entry = Self::new(date, input.reference, input.description, input.journal);
        for line in input.lines {
            entry.lines.push(AccountingEntryLine::try_from(line)?);
        }
        Ok(entry)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn journal(&self) -> &str {
        &self.journal
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn lines(&self) -> &[AccountingEntryLine] {
        &self.lines
    }

    // =========================================================================
    // Editing (drafts only)
    // =========================================================================

    fn ensure_editable(&self) -> CoreResult<()> {
        if self.status != EntryStatus::Draft {
            return Err(CoreError::EntryNotEditable { status: self.status });
        }
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) -> CoreResult<()> {
        self.ensure_editable()?;
        self.date = date;
        Ok(())
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) -> CoreResult<()> {
        self.ensure_editable()?;
        self.reference = reference.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> CoreResult<()> {
        self.ensure_editable()?;
        self.description = description.into();
        Ok(())
    }

    pub fn set_journal(&mut self, journal: impl Into<String>) -> CoreResult<()> {
        self.ensure_editable()?;
        self.journal = journal.into();
        Ok(())
    }

    /// Appends a line and returns its index.
    pub fn add_line(&mut self, line: AccountingEntryLine) -> CoreResult<usize> {
        self.ensure_editable()?;
        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    pub fn remove_line(&mut self, index: usize) -> CoreResult<AccountingEntryLine> {
        self.ensure_editable()?;
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Sets one side of a line; see [`AccountingEntryLine::set_amount`].
    pub fn set_line_amount(&mut self, index: usize, side: EntrySide, amount: Money) -> CoreResult<()> {
        self.ensure_editable()?;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound(index))?;
        line.set_amount(side, amount)?;
        Ok(())
    }

    // =========================================================================
    // Checks
    // =========================================================================

    pub fn balance(&self) -> BalanceSummary {
        check_balance(&self.lines)
    }

    pub fn is_balanced(&self) -> bool {
        self.balance().is_balanced
    }

    /// Header fields as the record the header rule set reads.
    pub fn header_record(&self) -> Record {
        let header = json!({
            "date": self.date.format("%Y-%m-%d").to_string(),
            "reference": self.reference,
            "journal": self.journal,
            "description": self.description,
        });
        match header {
            Value::Object(record) => record,
            _ => Record::new(),
        }
    }

    pub fn validate_header(&self) -> ValidationReport {
        schemas::entry_header_rules().validate(&self.header_record())
    }

    /// Whether [`AccountingEntry::validate`] would succeed.
    pub fn can_validate(&self) -> bool {
        self.status.can_transition_to(EntryStatus::Validated)
            && !self.lines.is_empty()
            && self.is_balanced()
            && self.validate_header().is_valid()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// `draft → validated`.
    ///
    /// ## Guards (in order)
    /// 1. Status is draft
    /// 2. At least one line
    /// 3. Header passes its rule set
    /// 4. Σ debit == Σ credit
    ///
    /// On failure the entry is left unchanged.
    pub fn validate(&mut self) -> CoreResult<BalanceSummary> {
        self.check_transition(EntryStatus::Validated)?;

        if self.lines.is_empty() {
            return Err(CoreError::EmptyEntry);
        }

        let header = self.validate_header();
        if !header.is_valid() {
            return Err(CoreError::InvalidHeader(header.into_errors()));
        }

        let summary = self.balance();
        if !summary.is_balanced {
            debug!(
                entry_id = %self.id,
                difference = %summary.difference,
                "Entry validation refused: unbalanced"
            );
            return Err(CoreError::UnbalancedEntry {
                total_debit: summary.total_debit,
                total_credit: summary.total_credit,
                difference: summary.difference,
            });
        }

        self.status = EntryStatus::Validated;
        debug!(entry_id = %self.id, total = %summary.total_debit, "Entry validated");
        Ok(summary)
    }

    /// `draft → cancelled`.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.check_transition(EntryStatus::Cancelled)?;
        self.status = EntryStatus::Cancelled;
        debug!(entry_id = %self.id, "Entry cancelled");
        Ok(())
    }

    /// Moves to `to` through the matching guarded transition.
    pub fn transition_to(&mut self, to: EntryStatus) -> CoreResult<()> {
        match to {
            EntryStatus::Validated => self.validate().map(|_| ()),
            EntryStatus::Cancelled => self.cancel(),
            EntryStatus::Draft => self.check_transition(to),
        }
    }

    fn check_transition(&self, to: EntryStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(CoreError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn m(major: i64) -> Money {
        Money::from_major(major)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn draft() -> AccountingEntry {
        AccountingEntry::new(date(), "VE-0001", "Vente de marchandises", "VE")
    }

    fn sale_lines(debit: i64, credit: i64) -> Vec<AccountingEntryLine> {
        vec![
            AccountingEntryLine::debiting("411", "Clients", m(debit)).unwrap(),
            AccountingEntryLine::crediting("701", "Ventes", m(credit)).unwrap(),
        ]
    }

    #[test]
    fn test_balanced_lines() {
        let summary = check_balance(&sale_lines(100, 100));
        assert!(summary.is_balanced);
        assert_eq!(summary.total_debit, m(100));
        assert_eq!(summary.total_credit, m(100));
        assert!(summary.difference.is_zero());
    }

    #[test]
    fn test_unbalanced_lines() {
        let summary = check_balance(&sale_lines(100, 99));
        assert!(!summary.is_balanced);
        assert_eq!(summary.difference, m(1));

        // One cent is already too much
        let mut lines = sale_lines(100, 100);
        lines[1].set_credit(Money::from_cents(10_001)).unwrap();
        let summary = check_balance(&lines);
        assert!(!summary.is_balanced);
        assert_eq!(summary.difference, Money::from_cents(-1));
    }

    #[test]
    fn test_empty_lines_are_balanced() {
        let summary = check_balance(&[]);
        assert!(summary.is_balanced);
        assert!(summary.total_debit.is_zero());
    }

    #[test]
    fn test_set_debit_clears_credit() {
        let mut line = AccountingEntryLine::crediting("401", "Fournisseurs", m(30)).unwrap();
        line.set_debit(m(50)).unwrap();
        assert_eq!(line.debit(), m(50));
        assert_eq!(line.credit(), Money::zero());
        assert_eq!(line.side(), Some(EntrySide::Debit));

        line.set_amount(EntrySide::Credit, m(20)).unwrap();
        assert_eq!((line.debit(), line.credit()), (Money::zero(), m(20)));
    }

    #[test]
    fn test_set_zero_keeps_other_side() {
        let mut line = AccountingEntryLine::debiting("601", "Achats", m(75)).unwrap();
        line.set_credit(Money::zero()).unwrap();
        assert_eq!(line.debit(), m(75));

        line.set_debit(Money::zero()).unwrap();
        assert_eq!(line.side(), None);
        assert!(line.amount().is_zero());
    }

    #[test]
    fn test_negative_amount_refused() {
        let mut line = AccountingEntryLine::debiting("601", "Achats", m(75)).unwrap();
        let err = line.set_credit(m(-5)).unwrap_err();
        assert_eq!(err.to_string(), "Crédit ne peut pas être négatif");
        // Untouched
        assert_eq!((line.debit(), line.credit()), (m(75), Money::zero()));
    }

    #[test]
    fn test_line_from_input() {
        let input: EntryLineInput = serde_json::from_value(json!({
            "accountCode": " 521 ",
            "accountName": "Banque",
            "debit": "1 500,25",
            "credit": null
        }))
        .unwrap();
        let line = AccountingEntryLine::try_from(input).unwrap();
        assert_eq!(line.account_code(), "521");
        assert_eq!(line.debit(), Money::from_cents(150_025));
        assert!(line.credit().is_zero());

        let mixed: EntryLineInput = serde_json::from_value(json!({
            "accountCode": "521",
            "debit": 10,
            "credit": 10
        }))
        .unwrap();
        assert!(matches!(
            AccountingEntryLine::try_from(mixed),
            Err(ValidationError::Custom { .. })
        ));

        let bad_account = EntryLineInput {
            account_code: "9999".to_string(),
            ..EntryLineInput::default()
        };
        assert!(matches!(
            AccountingEntryLine::try_from(bad_account),
            Err(ValidationError::InvalidFormat { .. })
        ));

        let negative: EntryLineInput =
            serde_json::from_value(json!({ "accountCode": "521", "credit": -3 })).unwrap();
        assert!(AccountingEntryLine::try_from(negative).is_err());
    }

    #[test]
    fn test_check_balance_raw() {
        let lines = vec![
            json!({ "debit": 100, "credit": 0 }),
            json!({ "credit": "100.00" }),
        ];
        assert!(check_balance_raw(&lines).is_balanced);

        let lines = vec![
            json!({ "debit": "100", "credit": "abc" }),
            json!({ "credit": 99 }),
            json!({ "debit": null }),
            json!("not an object"),
        ];
        let summary = check_balance_raw(&lines);
        assert!(!summary.is_balanced);
        assert_eq!(summary.total_debit, m(100));
        assert_eq!(summary.total_credit, m(99));
        assert_eq!(summary.difference, m(1));

        // Float noise rounds away at the cent
        let lines = vec![
            json!({ "debit": 0.1 }),
            json!({ "debit": 0.2 }),
            json!({ "credit": 0.3 }),
        ];
        assert!(check_balance_raw(&lines).is_balanced);
    }

    #[test]
    fn test_check_balance_raw_reads_exponents_and_large_floats() {
        let summary = check_balance_raw(&[json!({ "debit": 1e16 }), json!({ "credit": 0 })]);
        assert!(!summary.is_balanced);
        assert_eq!(summary.total_debit, Money::from_cents(1_000_000_000_000_000_000));

        let summary = check_balance_raw(&[json!({ "debit": "1e3" }), json!({ "credit": 0 })]);
        assert!(!summary.is_balanced);
        assert_eq!(summary.total_debit, m(1_000));

        let summary = check_balance_raw(&[json!({ "debit": "1e40" }), json!({ "credit": 1 })]);
        assert!(!summary.is_balanced);
        assert_eq!(summary.total_debit, Money::from_cents(i64::MAX));

        let balanced = check_balance_raw(&[json!({ "debit": "1e3" }), json!({ "credit": 1000 })]);
        assert!(balanced.is_balanced);
    }

    #[test]
    fn test_huge_totals_do_not_saturate_into_balance() {
        let lines = [
            json!({ "debit": 5e16 }),
            json!({ "debit": 5e16 }),
            json!({ "credit": 5e16 }),
            json!({ "credit": 6e16 }),
        ];
        let summary = check_balance_raw(&lines);
        assert!(!summary.is_balanced);
        assert_eq!(summary.total_debit, Money::from_cents(i64::MAX));
        assert_eq!(summary.total_credit, Money::from_cents(i64::MAX));
        assert_eq!(summary.difference, Money::from_cents(-1_000_000_000_000_000_000));

        let lines = [
            json!({ "debit": 5e16 }),
            json!({ "debit": 5e16 }),
            json!({ "credit": 1e17 }),
        ];
        assert!(check_balance_raw(&lines).is_balanced);

        let max = Money::from_cents(i64::MAX);
        let typed = [
            AccountingEntryLine::debiting("601", "Achats", max).unwrap(),
            AccountingEntryLine::debiting("601", "Achats", max).unwrap(),
            AccountingEntryLine::crediting("401", "Fournisseurs", max).unwrap(),
            AccountingEntryLine::crediting("401", "Fournisseurs", Money::from_cents(i64::MAX - 1)).unwrap(),
        ];
        let summary = check_balance(&typed);
        assert!(!summary.is_balanced);
        assert_eq!(summary.difference, Money::from_cents(1));
    }

    #[test]
    fn test_status_transitions() {
        use EntryStatus::*;
        assert!(Draft.can_transition_to(Validated));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(!Draft.can_transition_to(Draft));
        for from in [Validated, Cancelled] {
            assert!(from.is_terminal());
            for to in [Draft, Validated, Cancelled] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_status_display_and_parse() {
        assert_eq!(EntryStatus::Validated.to_string(), "validated");
        assert_eq!("Brouillon".parse::<EntryStatus>().unwrap(), EntryStatus::Draft);
        assert!("posted".parse::<EntryStatus>().is_err());
        assert_eq!(serde_json::to_value(EntryStatus::Cancelled).unwrap(), json!("cancelled"));
    }

    #[test]
    fn test_validate_balanced_entry() {
        let mut entry = draft();
        for line in sale_lines(118, 118) {
            entry.add_line(line).unwrap();
        }
        assert!(entry.can_validate());

        let summary = entry.validate().unwrap();
        assert_eq!(summary.total_debit, m(118));
        assert_eq!(entry.status(), EntryStatus::Validated);
    }

    #[test]
    fn test_validate_refusals() {
        let mut entry = draft();
        assert_eq!(entry.validate(), Err(CoreError::EmptyEntry));

        for line in sale_lines(100, 99) {
            entry.add_line(line).unwrap();
        }
        assert_eq!(
            entry.validate(),
            Err(CoreError::UnbalancedEntry {
                total_debit: m(100),
                total_credit: m(99),
                difference: m(1),
            })
        );
        assert_eq!(entry.status(), EntryStatus::Draft);

        // Drafts stay editable while unbalanced
        entry.set_line_amount(1, EntrySide::Credit, m(100)).unwrap();
        entry.set_description("").unwrap();
        match entry.validate() {
            Err(CoreError::InvalidHeader(errors)) => {
                assert_eq!(errors.get("description").map(String::as_str), Some("Libellé est requis"));
            }
            other => panic!("expected InvalidHeader, got {:?}", other),
        }

        entry.set_description("Vente comptant").unwrap();
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_terminal_entries_are_read_only() {
        let mut entry = draft();
        entry.cancel().unwrap();
        assert_eq!(entry.status(), EntryStatus::Cancelled);

        assert_eq!(
            entry.validate(),
            Err(CoreError::InvalidStatusTransition {
                from: EntryStatus::Cancelled,
                to: EntryStatus::Validated,
            })
        );
        assert!(entry.cancel().is_err());
        assert_eq!(
            entry.add_line(AccountingEntryLine::new("571", "Caisse")),
            Err(CoreError::EntryNotEditable {
                status: EntryStatus::Cancelled
            })
        );
        assert!(entry.transition_to(EntryStatus::Draft).is_err());
    }

    #[test]
    fn test_line_index_errors() {
        let mut entry = draft();
        assert_eq!(entry.remove_line(0), Err(CoreError::LineNotFound(0)));
        assert_eq!(
            entry.set_line_amount(3, EntrySide::Debit, m(1)),
            Err(CoreError::LineNotFound(3))
        );

        entry.add_line(AccountingEntryLine::new("571", "Caisse")).unwrap();
        let removed = entry.remove_line(0).unwrap();
        assert_eq!(removed.account_code(), "571");
        assert!(entry.lines().is_empty());
    }

    #[test]
    fn test_from_input() {
        let input: EntryInput = serde_json::from_value(json!({
            "date": "2024-01-31",
            "reference": "BQ-0042",
            "description": "Règlement client",
            "journal": "BQ",
            "lines": [
                { "accountCode": "521", "accountName": "Banque", "debit": 590 },
                { "accountCode": "411", "accountName": "Clients", "credit": "590" }
            ]
        }))
        .unwrap();

        let mut entry = AccountingEntry::from_input(input).unwrap();
        assert_eq!(entry.lines().len(), 2);
        assert_eq!(entry.date(), date());
        assert!(entry.validate().is_ok());

        let input = EntryInput {
            date: "31/01/2024".to_string(),
            ..EntryInput::default()
        };
        assert!(matches!(
            AccountingEntry::from_input(input),
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn test_entry_serialization() {
        let mut entry = draft();
        entry.add_line(sale_lines(10, 10).remove(0)).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-01-31");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["lines"][0]["accountCode"], "411");
        assert_eq!(json["lines"][0]["debit"], 1000);
        assert_eq!(Uuid::parse_str(entry.id()).unwrap().get_version_num(), 4);
    }
}
