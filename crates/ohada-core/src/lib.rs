//! # ohada-core: Validation & Monetary Kernel for Ohada ERP
//!
//! This crate decides whether a value may enter a financial document and
//! derives every computed amount on it. It follows the SYSCOHADA chart of
//! accounts used across the OHADA zone.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ohada ERP Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         SPA (browser)                           │   │
//! │  │   Factures ──► Écritures ──► Plan comptable ──► Paramètres      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                       REST handlers                             │   │
//! │  │      re-run every check, never trust the client                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ohada-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ checksum │ │  rules   │ │  money   │ │  entry   │          │   │
//! │  │   │ IBAN     │ │ FieldRule│ │ Money    │ │ balance  │          │   │
//! │  │   │ EAN-13   │ │ RuleSet  │ │ currency │ │ status   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • DETERMINISTIC                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 Persistence (outside this crate)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`checksum`] - IBAN mod-97 and EAN-13 check digits
//! - [`money`] - Money, Percent and Factor (integer arithmetic, no floats)
//! - [`currency`] - Percentages, taxes, discounts, invoice totals
//! - [`formats`] - Email, phone, account code, NINEA, RC, date predicates
//! - [`rules`] - Field rules and form evaluation
//! - [`schemas`] - Rule sets per document type
//! - [`validation`] - Amount, quantity and rate validators
//! - [`invoice`] - Invoice lines with derived totals
//! - [`entry`] - Accounting entries: balance, single-sided lines, status
//! - [`account`] - SYSCOHADA classes and accounts
//! - [`config`] - Currency, tax and validation settings
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; the config loader is the only I/O
//! 2. **Integer Money**: all monetary values are in cents (i64), so balances are exact
//! 3. **Total over data**: bad input becomes `false`, `None` or an error, never a panic
//! 4. **Derived values have no setters**: line totals and invoice totals cannot go stale
//!
//! ## Example Usage
//!
//! ```rust
//! use ohada_core::currency::calculate_invoice_total;
//! use ohada_core::{Money, Percent};
//!
//! let items = [(2i64, Money::from_major(100))];
//! let totals = calculate_invoice_total(&items, Percent::from_whole(10), Percent::from_whole(18));
//!
//! // 200 - 10% = 180, plus 18% VAT = 212.40
//! assert_eq!(totals.total.to_string(), "212.40");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod checksum;
pub mod config;
pub mod currency;
pub mod entry;
pub mod error;
pub mod formats;
pub mod invoice;
pub mod money;
pub mod rules;
pub mod schemas;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ohada_core::Money` instead of
// `use ohada_core::money::Money`

pub use account::{Account, AccountType, SyscohadaClass};
pub use config::KernelConfig;
pub use currency::InvoiceTotals;
pub use entry::{check_balance, AccountingEntry, AccountingEntryLine, BalanceSummary, EntrySide, EntryStatus};
pub use error::{ConfigError, CoreError, ValidationError};
pub use invoice::{Invoice, InvoiceLine};
pub use money::{Money, Percent};
pub use rules::{validate_form, FieldRule, FormErrors, RuleSet, ValidationReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fraction digits carried by [`Money`].
///
/// ## Why 2?
/// XOF has no minor unit in circulation, but invoices and VAT are computed
/// to the centime and the SPA displays two decimals.
pub const DECIMAL_PLACES: u32 = 2;
