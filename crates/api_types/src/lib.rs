//! Wire types exchanged with the wallet backend.
//!
//! Collections travel in a `{ "<plural>": [...] }` envelope and single
//! resources in a `{ "<singular>": {...} }` one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod amount;

pub use amount::{Amount, AmountError};

/// Backend primary key. Every resource carries one.
pub type Id = i64;

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Balance {
        pub incomes: Amount,
        pub expenses: Amount,
        pub rest: Amount,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Account {
        pub id: Id,
        pub name: String,
        /// Only present on responses computed by the backend.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub balance: Option<Balance>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AccountDraft {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsEnvelope {
        pub accounts: Vec<Account>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountEnvelope {
        pub account: Account,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub id: Id,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryDraft {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesEnvelope {
        pub categories: Vec<Category>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryEnvelope {
        pub category: Category,
    }
}

pub mod transaction {
    use chrono::NaiveDateTime;

    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        #[default]
        Expense,
        Transfer,
    }

    impl TransactionKind {
        pub const ALL: [TransactionKind; 3] = [Self::Income, Self::Expense, Self::Transfer];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
                Self::Transfer => "transfer",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == value.trim().to_ascii_lowercase())
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: Id,
        pub account_id: Id,
        pub category_id: Id,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        pub amount: Amount,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_on: Option<NaiveDateTime>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionDraft {
        pub account_id: Id,
        pub category_id: Id,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        pub amount: Amount,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Server uses now() when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_on: Option<NaiveDateTime>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsEnvelope {
        pub transactions: Vec<Transaction>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionEnvelope {
        pub transaction: Transaction,
    }
}

pub mod detail {
    use super::*;

    /// A line of a transaction (e.g. one item on a receipt).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionDetail {
        pub id: Id,
        pub transaction_id: Id,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub price_per_unit: Option<Amount>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub count: Option<f64>,
        pub total: Amount,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DetailDraft {
        pub transaction_id: Id,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub price_per_unit: Option<Amount>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub count: Option<f64>,
        pub total: Amount,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DetailsEnvelope {
        pub details: Vec<TransactionDetail>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DetailEnvelope {
        pub detail: TransactionDetail,
    }
}

pub mod session {
    use super::*;

    /// Response header carrying the access token after login.
    pub const TOKEN_HEADER: &str = "X-ACCESS-TOKEN";
    /// Token expiry as a unix timestamp in milliseconds.
    pub const TOKEN_EXPIRE_HEADER: &str = "X-ACCESS-TOKEN-EXPIRE";

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub login: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: Id,
        pub login: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserEnvelope {
        pub user: User,
    }
}

pub mod errors {
    use super::*;

    /// A field error as sent by the backend: one message or a list of them.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum FieldError {
        One(String),
        Many(Vec<String>),
    }

    impl FieldError {
        pub fn message(&self) -> String {
            match self {
                Self::One(message) => message.clone(),
                Self::Many(messages) => messages.join(", "),
            }
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ErrorsEnvelope {
        pub errors: BTreeMap<String, FieldError>,
    }

    impl ErrorsEnvelope {
        /// Flattens every field error into a single message per field.
        pub fn into_messages(self) -> BTreeMap<String, String> {
            self.errors
                .into_iter()
                .map(|(field, error)| (field, error.message()))
                .collect()
        }
    }
}
