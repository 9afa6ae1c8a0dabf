//! # Rule Evaluator
//!
//! Declarative per-field rules evaluated over a JSON record.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each field of the RuleSet (declaration order):                     │
//! │                                                                         │
//! │   required → min_length → max_length → email → phone → format          │
//! │            → min/max range → positive → custom                         │
//! │                                                                         │
//! │   First failing check wins, the rest are not run.                      │
//! │   A field with no failure does not appear in the result at all.        │
//! │                                                                         │
//! │   Empty optional field: only `custom` runs (it may cross-check         │
//! │   siblings, e.g. "IBAN required when payment is by transfer").         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ohada_core::rules::{validate_form, FieldRule, RuleSet};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("name", FieldRule::new().label("Nom").required().min_length(3))
//!     .field("email", FieldRule::new().label("E-mail").email());
//!
//! let record = json!({ "name": "", "email": "compta@entreprise.sn" });
//! let report = validate_form(record.as_object().unwrap(), &rules);
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.error("name"), Some("Nom est requis"));
//! assert_eq!(report.error("email"), None);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::formats::{self, Format, PhoneFormat};

/// A record as submitted by a form: field name → raw JSON value.
pub type Record = Map<String, Value>;

/// Field name → message. Absence of a key means the field is valid.
pub type FormErrors = BTreeMap<String, String>;

/// Cross-field check: receives the field value and the whole record.
pub type CustomCheck = Arc<dyn Fn(&Value, &Record) -> Option<String> + Send + Sync>;

static NULL: Value = Value::Null;

// =============================================================================
// Value Coercion
// =============================================================================

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.trim())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        other => as_text(other).map(|t| t.chars().count()),
    }
}

/// Numbers, or strings that read as numbers (`"1 250,5"`).
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '_'))
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

// =============================================================================
// Checks
// =============================================================================

/// One step of the priority chain.
enum Check<'a> {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Phone(PhoneFormat),
    Format(Format),
    Range { min: Option<f64>, max: Option<f64> },
    Positive,
    Custom(&'a CustomCheck),
}

impl Check<'_> {
    fn validate(&self, label: &str, value: &Value, record: &Record) -> Option<ValidationError> {
        let field = || label.to_string();

        match self {
            Check::Required => is_empty(value).then(|| ValidationError::Required { field: field() }),

            Check::MinLength(min) => match length_of(value) {
                Some(len) if len < *min => Some(ValidationError::TooShort {
                    field: field(),
                    min: *min,
                }),
                _ => None,
            },

            Check::MaxLength(max) => match length_of(value) {
                Some(len) if len > *max => Some(ValidationError::TooLong {
                    field: field(),
                    max: *max,
                }),
                _ => None,
            },

            Check::Email => match as_text(value) {
                Some(text) if formats::is_valid_email(&text) => None,
                _ => Some(ValidationError::InvalidEmail { field: field() }),
            },

            Check::Phone(format) => match as_text(value) {
                Some(text) if format.matches(&text) => None,
                _ => Some(ValidationError::InvalidPhone { field: field() }),
            },

            Check::Format(format) => match as_text(value) {
                Some(text) if format.matches(&text) => None,
                _ => Some(ValidationError::InvalidFormat {
                    field: field(),
                    reason: format.hint().to_string(),
                }),
            },

            Check::Range { min, max } => {
                let Some(n) = as_number(value) else {
                    return Some(ValidationError::NotANumber { field: field() });
                };
                if let Some(min) = min {
                    if n < *min {
                        return Some(ValidationError::BelowMinimum {
                            field: field(),
                            min: min.to_string(),
                        });
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Some(ValidationError::AboveMaximum {
                            field: field(),
                            max: max.to_string(),
                        });
                    }
                }
                None
            }

            Check::Positive => match as_number(value) {
                None => Some(ValidationError::NotANumber { field: field() }),
                Some(n) if n <= 0.0 => Some(ValidationError::MustBePositive { field: field() }),
                Some(_) => None,
            },

            Check::Custom(check) => check(value, record).map(|message| ValidationError::Custom { message }),
        }
    }
}

// =============================================================================
// Field Rule
// =============================================================================

/// Declarative constraints on one field.
///
/// Builder methods may be called in any order; evaluation order is fixed.
///
/// # Panics
/// Contradictory constraints (`min_length > max_length`, `min > max`,
/// non-finite bounds) are programming errors and panic at construction.
#[derive(Clone, Default)]
pub struct FieldRule {
    label: Option<String>,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    email: bool,
    phone: Option<PhoneFormat>,
    format: Option<Format>,
    min: Option<f64>,
    max: Option<f64>,
    positive: bool,
    custom: Option<CustomCheck>,
}

impl FieldRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(max) = self.max_length {
            assert!(min <= max, "min_length {} exceeds max_length {}", min, max);
        }
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(min) = self.min_length {
            assert!(min <= max, "min_length {} exceeds max_length {}", min, max);
        }
        self.max_length = Some(max);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn phone(mut self, format: PhoneFormat) -> Self {
        self.phone = Some(format);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        assert!(min.is_finite(), "min bound must be finite");
        if let Some(max) = self.max {
            assert!(min <= max, "min {} exceeds max {}", min, max);
        }
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        assert!(max.is_finite(), "max bound must be finite");
        if let Some(min) = self.min {
            assert!(min <= max, "min {} exceeds max {}", min, max);
        }
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value, &Record) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The checks this rule declares, in evaluation order.
    fn checks(&self) -> Vec<Check<'_>> {
        let mut checks = Vec::with_capacity(9);
        if self.required {
            checks.push(Check::Required);
        }
        if let Some(min) = self.min_length {
            checks.push(Check::MinLength(min));
        }
        if let Some(max) = self.max_length {
            checks.push(Check::MaxLength(max));
        }
        if self.email {
            checks.push(Check::Email);
        }
        if let Some(format) = self.phone {
            checks.push(Check::Phone(format));
        }
        if let Some(format) = self.format {
            checks.push(Check::Format(format));
        }
        if self.min.is_some() || self.max.is_some() {
            checks.push(Check::Range {
                min: self.min,
                max: self.max,
            });
        }
        if self.positive {
            checks.push(Check::Positive);
        }
        if let Some(custom) = &self.custom {
            checks.push(Check::Custom(custom));
        }
        checks
    }

    /// Evaluates this rule; `None` means the value passes.
    pub fn evaluate(&self, name: &str, value: &Value, record: &Record) -> Option<ValidationError> {
        let label = self.label.as_deref().unwrap_or(name);
        let empty = is_empty(value);

        self.checks()
            .into_iter()
            .filter(|check| !empty || matches!(check, Check::Required | Check::Custom(_)))
            .find_map(|check| check.validate(label, value, record))
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("format", &self.format)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("positive", &self.positive)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// Ordered field name → rule mapping for one document type.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(String, FieldRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    ///
    /// # Panics
    /// Declaring the same field twice is a programming error.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        assert!(
            self.rule(&name).is_none(),
            "field '{}' declared twice in rule set",
            name
        );
        self.fields.push((name, rule));
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Runs every field rule against `record`.
    pub fn validate(&self, record: &Record) -> ValidationReport {
        let mut errors = FormErrors::new();
        for (name, rule) in &self.fields {
            let value = record.get(name).unwrap_or(&NULL);
            if let Some(err) = rule.evaluate(name, value, record) {
                errors.insert(name.clone(), err.to_string());
            }
        }

        debug!(fields = self.fields.len(), errors = errors.len(), "Form validated");
        ValidationReport::from_errors(errors)
    }

    /// Same as [`RuleSet::validate`], for any JSON value.
    ///
    /// A non-object value is treated as a record with every field missing.
    pub fn validate_value(&self, value: &Value) -> ValidationReport {
        match value {
            Value::Object(record) => self.validate(record),
            _ => self.validate(&Record::new()),
        }
    }

    /// Evaluates a single field (on blur), still with access to the record.
    pub fn validate_field(&self, name: &str, record: &Record) -> Option<String> {
        let rule = self.rule(name)?;
        let value = record.get(name).unwrap_or(&NULL);
        rule.evaluate(name, value, record).map(|e| e.to_string())
    }
}

/// Validates `data` against `rules`.
pub fn validate_form(data: &Record, rules: &RuleSet) -> ValidationReport {
    rules.validate(data)
}

// =============================================================================
// Validation Report
// =============================================================================

/// Result of a form validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    is_valid: bool,
    errors: FormErrors,
}

impl ValidationReport {
    pub fn from_errors(errors: FormErrors) -> Self {
        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FormErrors {
        self.errors
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        ValidationReport::from_errors(FormErrors::new())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
