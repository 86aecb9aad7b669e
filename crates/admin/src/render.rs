//! Plain text views over the state slices.

use std::fmt::Write;

use api_types::{
    account::Account, category::Category, detail::TransactionDetail, transaction::Transaction,
};
use store::{CollectionState, ErrorMap, SessionState};

use crate::{forms::FormError, manage::Link};

/// One line of a list view.
pub trait Row {
    fn row(&self) -> String;
}

impl Row for Account {
    fn row(&self) -> String {
        match &self.balance {
            Some(balance) => format!(
                "#{:<4} {:<24} +{} -{} = {}",
                self.id, self.name, balance.incomes, balance.expenses, balance.rest
            ),
            None => format!("#{:<4} {}", self.id, self.name),
        }
    }
}

impl Row for Category {
    fn row(&self) -> String {
        format!("#{:<4} {}", self.id, self.name)
    }
}

impl Row for Transaction {
    fn row(&self) -> String {
        let date = self
            .created_on
            .map(|date| date.format("%d-%m-%Y %H:%M").to_string())
            .unwrap_or_default();
        format!(
            "#{:<4} {:<16} {:<8} {:>10}  account #{} category #{}  {}",
            self.id,
            date,
            self.kind.as_str(),
            self.amount.to_string(),
            self.account_id,
            self.category_id,
            self.description.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string()
    }
}

impl Row for TransactionDetail {
    fn row(&self) -> String {
        let mut line = format!("#{:<4} {:<24} {:>10}", self.id, self.name, self.total.to_string());
        if let (Some(price), Some(count)) = (self.price_per_unit, self.count) {
            let _ = write!(line, "  ({count} x {price})");
        }
        line
    }
}

pub fn errors(errors: &ErrorMap) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("! {field}: {message}\n"))
        .collect()
}

pub fn form_errors(errors: &[FormError]) -> String {
    errors
        .iter()
        .map(|error| format!("! {} ({})\n", error, error.kind.as_str()))
        .collect()
}

pub fn collection<R: Row>(title: &str, state: &CollectionState<R>) -> String {
    let mut out = format!("{title}\n");
    if state.is_fetching {
        out.push_str("loading...\n");
    }
    out.push_str(&errors(&state.errors));
    if state.items.is_empty() {
        out.push_str("(empty)\n");
    }
    for item in &state.items {
        out.push_str(&item.row());
        out.push('\n');
    }
    out
}

pub fn page<R: Row>(title: &str, instance: Option<&R>, links: &[Link]) -> String {
    let mut out = format!("{title}\n");
    if let Some(instance) = instance {
        out.push_str(&instance.row());
        out.push('\n');
    }
    for link in links {
        let _ = writeln!(out, "[{}] {}", link.label, link.path);
    }
    out
}

pub fn session(state: &SessionState) -> String {
    let mut out = match &state.user {
        Some(user) => format!("{} as {}\n", state.status.as_str(), user.login),
        None => format!("{}\n", state.status.as_str()),
    };
    out.push_str(&errors(&state.errors));
    out
}
