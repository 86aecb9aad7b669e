use std::fmt::Debug;

use api_types::{
    Id, account::Account, category::Category, detail::TransactionDetail,
    transaction::Transaction,
};

use crate::{
    action::{Action, ResourceAction, ResourceKind},
    crud::CollectionState,
    root::RootState,
};

/// A record the CRUD reducers can hold.
///
/// The reducers only look at [`Resource::id`]; everything else is opaque and
/// combined through [`Resource::merge`].
pub trait Resource: Clone + Debug + PartialEq + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> Id;

    /// Shallow merge: fields present in `update` win, optional fields it
    /// leaves out keep the value from `self`.
    fn merge(&self, update: &Self) -> Self;

    fn wrap(action: ResourceAction<Self>) -> Action;

    fn select(action: &Action) -> Option<&ResourceAction<Self>>;

    /// The slice of the root state holding this resource.
    fn slice(state: &RootState) -> &CollectionState<Self>;
}

impl Resource for Account {
    const KIND: ResourceKind = ResourceKind::Account;

    fn id(&self) -> Id {
        self.id
    }

    fn merge(&self, update: &Self) -> Self {
        Self {
            id: self.id,
            name: update.name.clone(),
            balance: update.balance.or(self.balance),
        }
    }

    fn wrap(action: ResourceAction<Self>) -> Action {
        Action::Accounts(action)
    }

    fn select(action: &Action) -> Option<&ResourceAction<Self>> {
        match action {
            Action::Accounts(action) => Some(action),
            _ => None,
        }
    }

    fn slice(state: &RootState) -> &CollectionState<Self> {
        &state.accounts
    }
}

impl Resource for Category {
    const KIND: ResourceKind = ResourceKind::Category;

    fn id(&self) -> Id {
        self.id
    }

    fn merge(&self, update: &Self) -> Self {
        Self {
            id: self.id,
            name: update.name.clone(),
        }
    }

    fn wrap(action: ResourceAction<Self>) -> Action {
        Action::Categories(action)
    }

    fn select(action: &Action) -> Option<&ResourceAction<Self>> {
        match action {
            Action::Categories(action) => Some(action),
            _ => None,
        }
    }

    fn slice(state: &RootState) -> &CollectionState<Self> {
        &state.categories
    }
}

impl Resource for Transaction {
    const KIND: ResourceKind = ResourceKind::Transaction;

    fn id(&self) -> Id {
        self.id
    }

    fn merge(&self, update: &Self) -> Self {
        Self {
            id: self.id,
            account_id: update.account_id,
            category_id: update.category_id,
            description: update
                .description
                .clone()
                .or_else(|| self.description.clone()),
            amount: update.amount,
            kind: update.kind,
            created_on: update.created_on.or(self.created_on),
        }
    }

    fn wrap(action: ResourceAction<Self>) -> Action {
        Action::Transactions(action)
    }

    fn select(action: &Action) -> Option<&ResourceAction<Self>> {
        match action {
            Action::Transactions(action) => Some(action),
            _ => None,
        }
    }

    fn slice(state: &RootState) -> &CollectionState<Self> {
        &state.transactions
    }
}

impl Resource for TransactionDetail {
    const KIND: ResourceKind = ResourceKind::Detail;

    fn id(&self) -> Id {
        self.id
    }

    fn merge(&self, update: &Self) -> Self {
        Self {
            id: self.id,
            transaction_id: update.transaction_id,
            name: update.name.clone(),
            price_per_unit: update.price_per_unit.or(self.price_per_unit),
            count: update.count.or(self.count),
            total: update.total,
        }
    }

    fn wrap(action: ResourceAction<Self>) -> Action {
        Action::Details(action)
    }

    fn select(action: &Action) -> Option<&ResourceAction<Self>> {
        match action {
            Action::Details(action) => Some(action),
            _ => None,
        }
    }

    fn slice(state: &RootState) -> &CollectionState<Self> {
        &state.details
    }
}
