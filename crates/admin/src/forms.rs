//! Form input validation.
//!
//! Validation errors are transient form state: they never reach the store.
//! A form that fails validation does not submit, so no action is dispatched.

use std::fmt;

use api_types::{
    Amount, Id,
    account::AccountDraft,
    category::CategoryDraft,
    detail::DetailDraft,
    transaction::{TransactionDraft, TransactionKind},
};
use chrono::NaiveDateTime;

const CREATED_ON_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Validation,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub kind: ErrorType,
    pub field: &'static str,
    pub message: String,
}

impl FormError {
    fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorType::Validation,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type Validated<T> = Result<T, Vec<FormError>>;

/// Local state of a form between two submits.
#[derive(Debug, Default)]
pub struct FormState {
    pub errors: Vec<FormError>,
}

impl FormState {
    /// Keeps the errors of a failed validation for display and hands back
    /// the draft only when there are none.
    pub fn submit<T>(&mut self, validated: Validated<T>) -> Option<T> {
        match validated {
            Ok(draft) => {
                self.errors.clear();
                Some(draft)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

fn required_name(raw: &str, errors: &mut Vec<FormError>) -> String {
    let name = raw.trim();
    if name.is_empty() {
        errors.push(FormError::validation("name", "Name could not be empty"));
    } else if name.chars().count() > MAX_TEXT_LEN {
        errors.push(FormError::validation("name", "Name is too long"));
    }
    name.to_string()
}

fn finish<T>(errors: Vec<FormError>, draft: impl FnOnce() -> T) -> Validated<T> {
    if errors.is_empty() {
        Ok(draft())
    } else {
        Err(errors)
    }
}

pub fn account(name: &str) -> Validated<AccountDraft> {
    let mut errors = Vec::new();
    let name = required_name(name, &mut errors);
    finish(errors, || AccountDraft { name })
}

pub fn category(name: &str) -> Validated<CategoryDraft> {
    let mut errors = Vec::new();
    let name = required_name(name, &mut errors);
    finish(errors, || CategoryDraft { name })
}

#[derive(Debug, Default, Clone)]
pub struct TransactionInput {
    pub account_id: Option<Id>,
    pub category_id: Option<Id>,
    pub description: Option<String>,
    pub amount: String,
    pub kind: String,
    pub created_on: Option<String>,
}

pub fn transaction(input: &TransactionInput) -> Validated<TransactionDraft> {
    let mut errors = Vec::new();

    let account_id = input.account_id.unwrap_or_default();
    if account_id <= 0 {
        errors.push(FormError::validation("account_id", "Account is required"));
    }
    let category_id = input.category_id.unwrap_or_default();
    if category_id <= 0 {
        errors.push(FormError::validation("category_id", "Category is required"));
    }

    let amount = parse_amount("amount", &input.amount, &mut errors).unwrap_or_default();

    let kind = TransactionKind::parse(&input.kind).unwrap_or_else(|| {
        errors.push(FormError::validation(
            "type",
            "Type must be one of income, expense, transfer",
        ));
        TransactionKind::default()
    });

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    if description
        .as_ref()
        .is_some_and(|text| text.chars().count() > MAX_TEXT_LEN)
    {
        errors.push(FormError::validation("description", "Description is too long"));
    }

    let created_on = match input.created_on.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match NaiveDateTime::parse_from_str(raw, CREATED_ON_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FormError::validation(
                    "created_on",
                    "Date must look like 2016-05-01T10:00:00",
                ));
                None
            }
        },
    };

    finish(errors, || TransactionDraft {
        account_id,
        category_id,
        description,
        amount,
        kind,
        created_on,
    })
}

#[derive(Debug, Default, Clone)]
pub struct DetailInput {
    pub transaction_id: Id,
    pub name: String,
    pub price_per_unit: Option<String>,
    pub count: Option<String>,
    pub total: String,
}

pub fn detail(input: &DetailInput) -> Validated<DetailDraft> {
    let mut errors = Vec::new();

    if input.transaction_id <= 0 {
        errors.push(FormError::validation(
            "transaction_id",
            "Transaction is required",
        ));
    }
    let name = required_name(&input.name, &mut errors);

    let price_per_unit = input
        .price_per_unit
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| parse_amount("price_per_unit", raw, &mut errors));

    let count = match input.count.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.replace(',', ".").parse::<f64>() {
            Ok(count) if count.is_finite() && count >= 0.0 => Some(count),
            _ => {
                errors.push(FormError::validation("count", "Count must be a number"));
                None
            }
        },
    };

    let total = parse_amount("total", &input.total, &mut errors).unwrap_or_default();

    finish(errors, || DetailDraft {
        transaction_id: input.transaction_id,
        name,
        price_per_unit,
        count,
        total,
    })
}

fn parse_amount(field: &'static str, raw: &str, errors: &mut Vec<FormError>) -> Option<Amount> {
    match raw.parse::<Amount>() {
        Ok(amount) => Some(amount),
        Err(err) => {
            errors.push(FormError::validation(field, format!("Invalid amount: {err}")));
            None
        }
    }
}
