//! # SYSCOHADA Chart of Accounts
//!
//! Account classes and the account record.
//!
//! ## The Eight Classes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Balance sheet                        │  Income statement               │
//! │  ─────────────                        │  ────────────────               │
//! │  1  Ressources durables (capital,     │  6  Charges des activités       │
//! │     réserves, emprunts)               │     ordinaires                  │
//! │  2  Actif immobilisé                  │  7  Produits des activités      │
//! │  3  Stocks                            │     ordinaires                  │
//! │  4  Tiers (clients, fournisseurs,     │  8  Autres charges et autres    │
//! │     État)                             │     produits (HAO)              │
//! │  5  Trésorerie                        │                                 │
//! │                                                                         │
//! │  Account 411000 → class 4, Clients                                     │
//! │  Account 601    → class 6, Achats de marchandises                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::entry::EntrySide;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::formats;

// =============================================================================
// Account Class
// =============================================================================

/// One of the eight SYSCOHADA classes, given by an account's leading digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SyscohadaClass {
    Resources,
    FixedAssets,
    Stocks,
    ThirdParties,
    Treasury,
    Expenses,
    Revenue,
    Other,
}

impl SyscohadaClass {
    pub const ALL: [SyscohadaClass; 8] = [
        SyscohadaClass::Resources,
        SyscohadaClass::FixedAssets,
        SyscohadaClass::Stocks,
        SyscohadaClass::ThirdParties,
        SyscohadaClass::Treasury,
        SyscohadaClass::Expenses,
        SyscohadaClass::Revenue,
        SyscohadaClass::Other,
    ];

    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=8 => Some(Self::ALL[(digit - 1) as usize]),
            _ => None,
        }
    }

    /// Class of an account number; `None` unless it is a valid account code.
    pub fn of(account_number: &str) -> Option<Self> {
        let number = account_number.trim();
        if !formats::is_valid_account_code(number) {
            return None;
        }
        let digit = number.as_bytes()[0] - b'0';
        Self::from_digit(digit)
    }

    pub fn number(&self) -> u8 {
        match self {
            SyscohadaClass::Resources => 1,
            SyscohadaClass::FixedAssets => 2,
            SyscohadaClass::Stocks => 3,
            SyscohadaClass::ThirdParties => 4,
            SyscohadaClass::Treasury => 5,
            SyscohadaClass::Expenses => 6,
            SyscohadaClass::Revenue => 7,
            SyscohadaClass::Other => 8,
        }
    }

    /// French class title as printed in the chart.
    pub fn name(&self) -> &'static str {
        match self {
            SyscohadaClass::Resources => "Comptes de ressources durables",
            SyscohadaClass::FixedAssets => "Comptes d'actif immobilisé",
            SyscohadaClass::Stocks => "Comptes de stocks",
            SyscohadaClass::ThirdParties => "Comptes de tiers",
            SyscohadaClass::Treasury => "Comptes de trésorerie",
            SyscohadaClass::Expenses => "Comptes de charges des activités ordinaires",
            SyscohadaClass::Revenue => "Comptes de produits des activités ordinaires",
            SyscohadaClass::Other => "Comptes des autres charges et des autres produits",
        }
    }

    /// Classes 1 to 5 feed the balance sheet, 6 to 8 the income statement.
    pub fn is_balance_sheet(&self) -> bool {
        self.number() <= 5
    }

    /// Account types conventionally found in this class.
    pub fn expected_types(&self) -> &'static [AccountType] {
        match self {
            SyscohadaClass::Resources => &[AccountType::Equity, AccountType::Liability],
            SyscohadaClass::FixedAssets | SyscohadaClass::Stocks | SyscohadaClass::Treasury => {
                &[AccountType::Asset]
            }
            SyscohadaClass::ThirdParties => &[AccountType::Asset, AccountType::Liability],
            SyscohadaClass::Expenses => &[AccountType::Expense],
            SyscohadaClass::Revenue => &[AccountType::Revenue],
            SyscohadaClass::Other => &[AccountType::Revenue, AccountType::Expense],
        }
    }
}

impl fmt::Display for SyscohadaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Classe {} - {}", self.number(), self.name())
    }
}

// =============================================================================
// Account Type
// =============================================================================

/// Nature of an account, independent of its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    /// Side on which the account normally carries its balance.
    pub fn normal_balance(&self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => EntrySide::Credit,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Asset => write!(f, "asset"),
            AccountType::Liability => write!(f, "liability"),
            AccountType::Equity => write!(f, "equity"),
            AccountType::Revenue => write!(f, "revenue"),
            AccountType::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "actif" => Ok(AccountType::Asset),
            "liability" | "passif" => Ok(AccountType::Liability),
            "equity" | "capitaux" => Ok(AccountType::Equity),
            "revenue" | "produit" => Ok(AccountType::Revenue),
            "expense" | "charge" => Ok(AccountType::Expense),
            other => Err(format!(
                "Unknown account type: '{}'. Valid options: asset, liability, equity, revenue, expense",
                other
            )),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// An entry of the chart of accounts.
///
/// The class is derived from the number and cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    account_number: String,
    name: String,
    account_type: AccountType,
    class: SyscohadaClass,
}

impl Account {
    /// Creates an account.
    ///
    /// ## Example
    /// ```rust
    /// use ohada_core::account::{Account, AccountType, SyscohadaClass};
    ///
    /// let clients = Account::new("411000", "Clients", AccountType::Asset).unwrap();
    /// assert_eq!(clients.class(), SyscohadaClass::ThirdParties);
    /// assert!(Account::new("9100", "Hors plan", AccountType::Asset).is_err());
    /// ```
    pub fn new(account_number: &str, name: &str, account_type: AccountType) -> CoreResult<Self> {
        let account_number = account_number.trim();
        let class = SyscohadaClass::of(account_number)
            .ok_or_else(|| CoreError::InvalidAccountNumber(account_number.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "Intitulé".to_string(),
            }
            .into());
        }

        let account = Account {
            account_number: account_number.to_string(),
            name: name.to_string(),
            account_type,
            class,
        };

        if !account.type_matches_class() {
            warn!(
                account = %account.account_number,
                account_type = %account_type,
                class = class.number(),
                "Account type unusual for its SYSCOHADA class"
            );
        }

        Ok(account)
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn class(&self) -> SyscohadaClass {
        self.class
    }

    /// Whether the type is one conventionally found in the class.
    pub fn type_matches_class(&self) -> bool {
        self.class.expected_types().contains(&self.account_type)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
