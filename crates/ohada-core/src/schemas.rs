//! # Document Rule Sets
//!
//! One [`RuleSet`] per document type, built once and shared process-wide.
//!
//! ## Where Rule Sets Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPA form ──submit──► REST handler                                      │
//! │                          │                                              │
//! │                          ├── invoice_rules()        /factures           │
//! │                          ├── customer_rules()       /clients            │
//! │                          ├── product_rules()        /produits           │
//! │                          ├── entry_header_rules()   /ecritures          │
//! │                          ├── account_rules()        /plan-comptable     │
//! │                          └── company_rules()        /societe            │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                   ValidationReport { isValid, errors }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys are the camelCase names the SPA posts.

use lazy_static::lazy_static;
use serde_json::Value;

use crate::account::AccountType;
use crate::formats::{self, Format, PhoneFormat};
use crate::rules::{as_number, FieldRule, Record, RuleSet};
use crate::money::Percent;
use crate::validation::{validate_amount, validate_quantity_value, AmountBounds};

lazy_static! {
    static ref INVOICE_RULES: RuleSet = invoice_rules_with(Percent::hundred(), AmountBounds::default());
    static ref CUSTOMER_RULES: RuleSet = customer_rules_for(PhoneFormat::Senegal);
    static ref PRODUCT_RULES: RuleSet = build_product_rules();
    static ref ENTRY_HEADER_RULES: RuleSet = build_entry_header_rules();
    static ref ACCOUNT_RULES: RuleSet = build_account_rules();
    static ref COMPANY_RULES: RuleSet = build_company_rules();
}

pub fn invoice_rules() -> &'static RuleSet {
    &INVOICE_RULES
}

/// Customer rules with Senegalese phone numbers. See [`customer_rules_for`].
pub fn customer_rules() -> &'static RuleSet {
    &CUSTOMER_RULES
}

pub fn product_rules() -> &'static RuleSet {
    &PRODUCT_RULES
}

/// Header of an accounting entry: date, reference, journal, description.
pub fn entry_header_rules() -> &'static RuleSet {
    &ENTRY_HEADER_RULES
}

pub fn account_rules() -> &'static RuleSet {
    &ACCOUNT_RULES
}

pub fn company_rules() -> &'static RuleSet {
    &COMPANY_RULES
}

// =============================================================================
// Invoice
// =============================================================================

/// Invoice rules with a tax ceiling and unit price bounds, as read from
/// `[tax] max_rate_bps` and `[validation] max_amount_cents`.
/// [`invoice_rules`] is this with 100% and [`AmountBounds::default`].
pub fn invoice_rules_with(max_tax_rate: Percent, price_bounds: AmountBounds) -> RuleSet {
    RuleSet::new()
        .field("customerId", FieldRule::new().label("Client").required())
        .field(
            "date",
            FieldRule::new().label("Date de facture").required().format(Format::Date),
        )
        .field(
            "dueDate",
            FieldRule::new()
                .label("Date d'échéance")
                .format(Format::Date)
                .custom(due_date_not_before_issue),
        )
        .field("reference", FieldRule::new().label("Référence").max_length(50))
        .field("discount", FieldRule::new().label("Remise").range(0.0, 100.0))
        .field(
            "taxRate",
            FieldRule::new().label("Taux de TVA").range(0.0, max_tax_rate.percentage().max(0.0)),
        )
        .field(
            "items",
            FieldRule::new()
                .label("Articles")
                .required()
                .custom(move |value, _| invoice_items_valid(value, &price_bounds)),
        )
        .field("notes", FieldRule::new().label("Notes").max_length(500))
}

fn due_date_not_before_issue(value: &Value, record: &Record) -> Option<String> {
    let due = formats::parse_iso_date(value.as_str()?)?;
    let issued = formats::parse_iso_date(record.get("date")?.as_str()?)?;
    (due < issued).then(|| "La date d'échéance doit être postérieure à la date de facture".to_string())
}

/// Each line needs a whole positive quantity and a unit price within `bounds`.
fn invoice_items_valid(value: &Value, bounds: &AmountBounds) -> Option<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return None,
        _ => return Some("Articles doit être une liste".to_string()),
    };

    for (index, item) in items.iter().enumerate() {
        let line = index + 1;
        let Some(item) = item.as_object() else {
            return Some(format!("Ligne {} : article invalide", line));
        };

        let quantity = item.get("quantity").unwrap_or(&Value::Null);
        if let Err(e) = validate_quantity_value(quantity) {
            return Some(format!("Ligne {} : {}", line, e));
        }

        let price = item.get("unitPrice").unwrap_or(&Value::Null);
        if let Err(e) = validate_amount(price, bounds, "Prix unitaire") {
            return Some(format!("Ligne {} : {}", line, e));
        }
    }

    None
}

// =============================================================================
// Customer
// =============================================================================

/// Customer rules accepting the given phone format.
///
/// ## Example
/// ```rust
/// use ohada_core::formats::PhoneFormat;
/// use ohada_core::schemas::customer_rules_for;
/// use serde_json::json;
///
/// let rules = customer_rules_for(PhoneFormat::Senegal);
/// let record = json!({ "name": "Moussa Ndiaye", "phone": "77 123 45 67" });
/// assert!(rules.validate(record.as_object().unwrap()).is_valid());
/// ```
pub fn customer_rules_for(phone: PhoneFormat) -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            FieldRule::new().label("Nom").required().min_length(2).max_length(100),
        )
        .field("email", FieldRule::new().label("E-mail").email())
        .field("phone", FieldRule::new().label("Téléphone").phone(phone))
        .field("address", FieldRule::new().label("Adresse").max_length(255))
        .field("ninea", FieldRule::new().label("NINEA").format(Format::Ninea))
        .field("creditLimit", FieldRule::new().label("Plafond de crédit").min(0.0))
}

// =============================================================================
// Product
// =============================================================================

fn build_product_rules() -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            FieldRule::new().label("Désignation").required().min_length(2).max_length(100),
        )
        .field(
            "reference",
            FieldRule::new().label("Référence").required().max_length(50),
        )
        .field("barcode", FieldRule::new().label("Code-barres").format(Format::Ean13))
        .field(
            "purchasePrice",
            FieldRule::new().label("Prix d'achat").required().min(0.0),
        )
        .field(
            "sellingPrice",
            FieldRule::new()
                .label("Prix de vente")
                .required()
                .positive()
                .custom(selling_above_purchase),
        )
        .field("stockQuantity", FieldRule::new().label("Stock").min(0.0))
        .field("alertThreshold", FieldRule::new().label("Seuil d'alerte").min(0.0))
        .field("taxRate", FieldRule::new().label("Taux de TVA").range(0.0, 100.0))
}

fn selling_above_purchase(value: &Value, record: &Record) -> Option<String> {
    let selling = as_number(value)?;
    let purchase = as_number(record.get("purchasePrice")?)?;
    (selling <= purchase).then(|| "Le prix de vente doit être supérieur au prix d'achat".to_string())
}

// =============================================================================
// Accounting
// =============================================================================

fn build_entry_header_rules() -> RuleSet {
    RuleSet::new()
        .field("date", FieldRule::new().label("Date").required().format(Format::Date))
        .field(
            "reference",
            FieldRule::new().label("Référence").required().max_length(50),
        )
        .field("journal", FieldRule::new().label("Journal").required().max_length(10))
        .field(
            "description",
            FieldRule::new().label("Libellé").required().min_length(3).max_length(255),
        )
}

fn build_account_rules() -> RuleSet {
    RuleSet::new()
        .field(
            "accountNumber",
            FieldRule::new()
                .label("Numéro de compte")
                .required()
                .format(Format::AccountCode),
        )
        .field(
            "name",
            FieldRule::new().label("Intitulé").required().min_length(2).max_length(100),
        )
        .field(
            "accountType",
            FieldRule::new().label("Type de compte").required().custom(|value, _| {
                let known = value.as_str().is_some_and(|s| s.parse::<AccountType>().is_ok());
                (!known).then(|| "Type de compte inconnu".to_string())
            }),
        )
}

// =============================================================================
// Company
// =============================================================================

fn build_company_rules() -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            FieldRule::new().label("Raison sociale").required().min_length(2).max_length(150),
        )
        .field("ninea", FieldRule::new().label("NINEA").required().format(Format::Ninea))
        .field("rc", FieldRule::new().label("Registre du commerce").format(Format::Rc))
        .field("email", FieldRule::new().label("E-mail").email())
        .field("phone", FieldRule::new().label("Téléphone").phone(PhoneFormat::Senegal))
        .field("fiscalYear", FieldRule::new().label("Exercice").format(Format::FiscalYear))
        .field(
            "iban",
            FieldRule::new()
                .label("IBAN")
                .format(Format::Iban)
                .custom(|value, record| {
                    let by_transfer = record.get("paymentMethod").and_then(Value::as_str) == Some("transfer");
                    (by_transfer && value.as_str().map_or(true, |s| s.trim().is_empty()))
                        .then(|| "IBAN requis pour un paiement par virement".to_string())
                }),
        )
}

// =============================================================================
// Unit Tests
// =============================================================================
