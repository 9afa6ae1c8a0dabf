//! # Format Predicates
//!
//! Boolean checks on the textual shape of identifiers found on Senegalese
//! accounting documents. Each pattern is compiled once.
//!
//! | Predicate             | Shape                                   |
//! |-----------------------|-----------------------------------------|
//! | email                 | `local@domain.tld` (RFC-light)          |
//! | Senegal phone         | `77 123 45 67`, `+221 70 123 45 67`     |
//! | international phone   | E.164: `+221701234567`                  |
//! | SYSCOHADA account     | `4`, `411`, `6011000` (1-8 then ≤6 digits) |
//! | fiscal year           | `2000` ..= `2100`                       |
//! | accounting period     | `2024-07`                               |
//! | NINEA                 | 7 digits                                |
//! | RC                    | `SN-DKR-2019-B-12345`                   |
//! | ISO date              | `2024-02-29` (real calendar day)        |
//! | IBAN / EAN-13         | see [`crate::checksum`]                 |

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checksum;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles");
    static ref SENEGAL_PHONE: Regex =
        Regex::new(r"^(77|78|70|76|75)[0-9]{7}$").expect("phone pattern compiles");
    static ref INTERNATIONAL_PHONE: Regex =
        Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone pattern compiles");
    static ref ACCOUNT_CODE: Regex =
        Regex::new(r"^[1-8][0-9]{0,6}$").expect("account pattern compiles");
    static ref FISCAL_YEAR: Regex = Regex::new(r"^[0-9]{4}$").expect("year pattern compiles");
    static ref PERIOD: Regex =
        Regex::new(r"^([0-9]{4})-(0[1-9]|1[0-2])$").expect("period pattern compiles");
    static ref NINEA: Regex = Regex::new(r"^[0-9]{7}$").expect("ninea pattern compiles");
    static ref RC: Regex =
        Regex::new(r"^SN-[A-Z]{3}-[0-9]{4}-[A-Z]-[0-9]{5}$").expect("rc pattern compiles");
    static ref ISO_DATE: Regex =
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles");
}

pub const MIN_FISCAL_YEAR: i32 = 2000;
pub const MAX_FISCAL_YEAR: i32 = 2100;

// =============================================================================
// Contact Details
// =============================================================================

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Strips grouping characters users type inside phone numbers.
fn compact_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Senegalese mobile number, with or without the `+221`/`00221` prefix.
///
/// ## Example
/// ```rust
/// use ohada_core::formats::is_valid_senegal_phone;
///
/// assert!(is_valid_senegal_phone("77 123 45 67"));
/// assert!(is_valid_senegal_phone("+221 78-123-45-67"));
/// assert!(!is_valid_senegal_phone("79 123 45 67"));
/// ```
pub fn is_valid_senegal_phone(phone: &str) -> bool {
    let compact = compact_phone(phone);
    let local = compact
        .strip_prefix("+221")
        .or_else(|| compact.strip_prefix("00221"))
        .unwrap_or(&compact);
    SENEGAL_PHONE.is_match(local)
}

/// Looser E.164-style number for foreign customers and suppliers.
pub fn is_valid_international_phone(phone: &str) -> bool {
    INTERNATIONAL_PHONE.is_match(&compact_phone(phone))
}

/// Which phone predicate a form applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneFormat {
    #[default]
    Senegal,
    International,
}

impl PhoneFormat {
    pub fn matches(&self, phone: &str) -> bool {
        match self {
            PhoneFormat::Senegal => is_valid_senegal_phone(phone),
            PhoneFormat::International => is_valid_international_phone(phone),
        }
    }
}

impl fmt::Display for PhoneFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhoneFormat::Senegal => write!(f, "senegal"),
            PhoneFormat::International => write!(f, "international"),
        }
    }
}

impl FromStr for PhoneFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "senegal" | "sn" | "local" => Ok(PhoneFormat::Senegal),
            "international" | "intl" | "e164" => Ok(PhoneFormat::International),
            other => Err(format!(
                "Unknown phone format: '{}'. Valid options: senegal, international",
                other
            )),
        }
    }
}

// =============================================================================
// Accounting Identifiers
// =============================================================================

/// SYSCOHADA account code: class digit 1-8 followed by up to 6 digits.
pub fn is_valid_account_code(code: &str) -> bool {
    ACCOUNT_CODE.is_match(code.trim())
}

/// Four digits between 2000 and 2100.
pub fn is_valid_fiscal_year(year: &str) -> bool {
    let year = year.trim();
    FISCAL_YEAR.is_match(year)
        && year
            .parse::<i32>()
            .map(|y| (MIN_FISCAL_YEAR..=MAX_FISCAL_YEAR).contains(&y))
            .unwrap_or(false)
}

/// Accounting period `YYYY-MM`.
pub fn is_valid_period(period: &str) -> bool {
    PERIOD.is_match(period.trim())
}

/// Senegalese NINEA (7 digits).
pub fn is_valid_ninea(ninea: &str) -> bool {
    NINEA.is_match(ninea.trim())
}

/// Registre du Commerce number, e.g. `SN-DKR-2019-B-12345`.
pub fn is_valid_rc(rc: &str) -> bool {
    RC.is_match(rc.trim())
}

/// `YYYY-MM-DD` naming a day that exists.
pub fn parse_iso_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    if !ISO_DATE.is_match(date) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

pub fn is_valid_iso_date(date: &str) -> bool {
    parse_iso_date(date).is_some()
}

// =============================================================================
// Format Selector
// =============================================================================

/// Named formats a [`FieldRule`](crate::rules::FieldRule) can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    AccountCode,
    FiscalYear,
    Period,
    Ninea,
    Rc,
    Iban,
    Ean13,
    Date,
}

impl Format {
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Format::AccountCode => is_valid_account_code(input),
            Format::FiscalYear => is_valid_fiscal_year(input),
            Format::Period => is_valid_period(input),
            Format::Ninea => is_valid_ninea(input),
            Format::Rc => is_valid_rc(input),
            Format::Iban => checksum::is_valid_iban(input),
            Format::Ean13 => checksum::is_valid_ean13(input.trim()),
            Format::Date => is_valid_iso_date(input),
        }
    }

    /// Explanation appended to the field label in error messages.
    pub fn hint(&self) -> &'static str {
        match self {
            Format::AccountCode => "code de compte SYSCOHADA attendu (classe 1 à 8, 7 chiffres max)",
            Format::FiscalYear => "exercice attendu entre 2000 et 2100",
            Format::Period => "période attendue au format AAAA-MM",
            Format::Ninea => "NINEA attendu sur 7 chiffres",
            Format::Rc => "RC attendu au format SN-XXX-AAAA-X-NNNNN",
            Format::Iban => "IBAN incorrect",
            Format::Ean13 => "code EAN-13 incorrect",
            Format::Date => "date attendue au format AAAA-MM-JJ",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("compta@entreprise.sn"));
        assert!(is_valid_email(" a.b+c@mail.example.com "));
        assert!(!is_valid_email("compta@entreprise"));
        assert!(!is_valid_email("compta entreprise.sn"));
        assert!(!is_valid_email("@entreprise.sn"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_senegal_phone() {
        for ok in ["771234567", "78 123 45 67", "70.123.45.67", "+221761234567", "00221 75 123 45 67"] {
            assert!(is_valid_senegal_phone(ok), "{}", ok);
        }
        for bad in ["791234567", "77123456", "7712345678", "+33612345678", ""] {
            assert!(!is_valid_senegal_phone(bad), "{}", bad);
        }
    }

    #[test]
    fn test_international_phone() {
        assert!(is_valid_international_phone("+33612345678"));
        assert!(is_valid_international_phone("221 77 123 45 67"));
        assert!(!is_valid_international_phone("+0612345678"));
        assert!(!is_valid_international_phone("+1234567890123456"));
        assert!(!is_valid_international_phone("+"));
    }

    #[test]
    fn test_phone_format_parsing() {
        assert_eq!("senegal".parse::<PhoneFormat>().unwrap(), PhoneFormat::Senegal);
        assert_eq!("E164".parse::<PhoneFormat>().unwrap(), PhoneFormat::International);
        assert!("mars".parse::<PhoneFormat>().is_err());
        assert!(PhoneFormat::International.matches("+33612345678"));
        assert!(!PhoneFormat::Senegal.matches("+33612345678"));
    }

    #[test]
    fn test_account_code() {
        for ok in ["1", "411", "4111000", "601", "8"] {
            assert!(is_valid_account_code(ok), "{}", ok);
        }
        for bad in ["0", "9", "41110000", "41A", "", "-411"] {
            assert!(!is_valid_account_code(bad), "{}", bad);
        }
    }

    #[test]
    fn test_fiscal_year() {
        assert!(is_valid_fiscal_year("2000"));
        assert!(is_valid_fiscal_year("2024"));
        assert!(is_valid_fiscal_year("2100"));
        assert!(!is_valid_fiscal_year("1999"));
        assert!(!is_valid_fiscal_year("2101"));
        assert!(!is_valid_fiscal_year("24"));
        assert!(!is_valid_fiscal_year("20245"));
    }

    #[test]
    fn test_period() {
        assert!(is_valid_period("2024-01"));
        assert!(is_valid_period("2024-12"));
        assert!(!is_valid_period("2024-00"));
        assert!(!is_valid_period("2024-13"));
        assert!(!is_valid_period("2024-1"));
        assert!(!is_valid_period("2024/01"));
    }

    #[test]
    fn test_ninea_and_rc() {
        assert!(is_valid_ninea("0012345"));
        assert!(!is_valid_ninea("001234"));
        assert!(!is_valid_ninea("00123456"));

        assert!(is_valid_rc("SN-DKR-2019-B-12345"));
        assert!(!is_valid_rc("SN-DK-2019-B-12345"));
        assert!(!is_valid_rc("sn-dkr-2019-b-12345"));
        assert!(!is_valid_rc("SN-DKR-2019-B-1234"));
    }

    #[test]
    fn test_iso_date() {
        assert!(is_valid_iso_date("2024-02-29"));
        assert!(!is_valid_iso_date("2023-02-29"));
        assert!(!is_valid_iso_date("2024-2-1"));
        assert!(!is_valid_iso_date("29/02/2024"));
        assert_eq!(
            parse_iso_date("2024-07-01"),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
    }

    #[test]
    fn test_only_ascii_digits_count() {
        // Arabic-Indic digits are Unicode digits but not accepted anywhere
        assert!(!is_valid_account_code("4١١"));
        assert!(!is_valid_ninea("٠٠١٢٣٤٥"));
        assert!(!is_valid_senegal_phone("77١٢٣٤٥٦٧"));
        assert!(!is_valid_international_phone("+٣٣٦١٢٣٤٥٦٧٨"));
        assert!(!is_valid_period("٢٠٢٤-01"));
        assert!(!is_valid_fiscal_year("٢٠٢٤"));
        assert!(!is_valid_rc("SN-DKR-٢٠١٩-B-12345"));
        assert!(!is_valid_iso_date("٢٠٢٤-02-29"));
    }

    #[test]
    fn test_format_selector() {
        assert!(Format::Iban.matches("SN08 SN01 0015 2000 0485 0000 3035"));
        assert!(Format::Ean13.matches("4006381333931"));
        assert!(Format::AccountCode.matches("521"));
        assert!(!Format::Period.matches("2024-13"));
        assert!(!Format::Date.hint().is_empty());
    }
}
