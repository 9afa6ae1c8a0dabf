//! # Error Types
//!
//! Domain-specific error types for ohada-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ValidationError  - One field failed one check (format, range, type)   │
//! │                     Display = the message shown under the input        │
//! │                                                                         │
//! │  CoreError        - A whole document broke an invariant                │
//! │                     (unbalanced entry, forbidden status transition)    │
//! │                                                                         │
//! │  ConfigError      - ohada.toml could not be read or is inconsistent    │
//! │                                                                         │
//! │  Flow: ValidationError → FormErrors (per field) → CoreError → caller   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Field errors carry the field *label*, so `to_string()` is user-ready
//! 3. Bad data never panics: it becomes one of these values
//! 4. Field messages are French, the working language of the users

use thiserror::Error;

use crate::entry::EntryStatus;
use crate::money::Money;
use crate::rules::FormErrors;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` holds the human label (e.g. "Numéro de compte"), not the JSON key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} est requis")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} doit contenir au moins {min} caractères")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} doit contenir au plus {max} caractères")]
    TooLong { field: String, max: usize },

    /// Not an email address.
    #[error("{field} doit être une adresse e-mail valide")]
    InvalidEmail { field: String },

    /// Not a phone number in the expected format.
    #[error("{field} doit être un numéro de téléphone valide")]
    InvalidPhone { field: String },

    /// Invalid format (IBAN, account code, period, ...).
    #[error("{field} est invalide : {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not numeric (or is NaN / infinite).
    #[error("{field} doit être un nombre")]
    NotANumber { field: String },

    /// Value has a fractional part where a whole number is expected.
    #[error("{field} doit être un nombre entier")]
    NotAnInteger { field: String },

    /// Value is below the allowed minimum.
    #[error("{field} doit être supérieur ou égal à {min}")]
    BelowMinimum { field: String, min: String },

    /// Value is above the allowed maximum.
    #[error("{field} doit être inférieur ou égal à {max}")]
    AboveMaximum { field: String, max: String },

    /// Value must be strictly positive.
    #[error("{field} doit être positif")]
    MustBePositive { field: String },

    /// Negative value where negatives are disallowed.
    #[error("{field} ne peut pas être négatif")]
    NegativeNotAllowed { field: String },

    /// Message produced by a custom (cross-field) rule.
    #[error("{message}")]
    Custom { message: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Document-level errors.
///
/// These block a status transition or a document constructor; they never
/// block editing a draft.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Debits and credits differ.
    ///
    /// ## User Workflow
    /// ```text
    /// Entry (draft): debit 100.00 / credit 99.00
    ///      │
    ///      ▼
    /// validate() ──► UnbalancedEntry { difference: 1.00 }
    ///      │
    ///      ▼
    /// UI keeps the entry in draft and shows the difference
    /// ```
    #[error("Entry is unbalanced: debit {total_debit}, credit {total_credit} (difference {difference})")]
    UnbalancedEntry {
        total_debit: Money,
        total_credit: Money,
        difference: Money,
    },

    /// Entry has no lines.
    #[error("Entry must contain at least one line")]
    EmptyEntry,

    /// Header fields failed their rule set.
    #[error("Entry header is invalid ({} field(s) in error)", .0.len())]
    InvalidHeader(FormErrors),

    /// Status machine refused the transition.
    #[error("Cannot move entry from {from} to {to}")]
    InvalidStatusTransition { from: EntryStatus, to: EntryStatus },

    /// Only drafts can be edited.
    #[error("Entry is {status} and can no longer be edited")]
    EntryNotEditable { status: EntryStatus },

    /// No line at this index.
    #[error("No line at index {0}")]
    LineNotFound(usize),

    /// Account number is not a SYSCOHADA account code.
    #[error("Invalid SYSCOHADA account number: {0}")]
    InvalidAccountNumber(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or write the config file.
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No config path was given and no platform config dir exists.
    #[error("No config path available")]
    NoConfigPath,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
