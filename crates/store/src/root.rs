//! The whole application state and the reducer combining every slice.

use std::sync::Arc;

use api_types::{
    account::Account, category::Category, detail::TransactionDetail, transaction::Transaction,
};

use crate::{
    Reducer,
    action::Action,
    crud::{CollectionState, CrudReducer},
    router::{RouterReducer, RouterState},
    session::{SessionReducer, SessionState},
};

#[derive(Clone, Debug, PartialEq)]
pub struct RootState {
    pub router: Arc<RouterState>,
    pub session: Arc<SessionState>,
    pub accounts: Arc<CollectionState<Account>>,
    pub categories: Arc<CollectionState<Category>>,
    pub transactions: Arc<CollectionState<Transaction>>,
    pub details: Arc<CollectionState<TransactionDetail>>,
}

/// Runs every slice reducer on every action; each one ignores the kinds it
/// does not know.
pub struct RootReducer {
    router: RouterReducer,
    session: SessionReducer,
    accounts: CrudReducer<Account>,
    categories: CrudReducer<Category>,
    transactions: CrudReducer<Transaction>,
    details: CrudReducer<TransactionDetail>,
}

impl Default for RootReducer {
    fn default() -> Self {
        Self {
            router: RouterReducer,
            session: SessionReducer,
            accounts: CrudReducer::standard(),
            categories: CrudReducer::standard(),
            transactions: CrudReducer::standard(),
            details: CrudReducer::standard(),
        }
    }
}

impl RootReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(mut self, reducer: CrudReducer<Account>) -> Self {
        self.accounts = reducer;
        self
    }

    pub fn categories(mut self, reducer: CrudReducer<Category>) -> Self {
        self.categories = reducer;
        self
    }

    pub fn transactions(mut self, reducer: CrudReducer<Transaction>) -> Self {
        self.transactions = reducer;
        self
    }

    pub fn details(mut self, reducer: CrudReducer<TransactionDetail>) -> Self {
        self.details = reducer;
        self
    }

    pub fn initial_state(&self) -> Arc<RootState> {
        Arc::new(RootState {
            router: Arc::new(RouterState::default()),
            session: Arc::new(SessionState::default()),
            accounts: self.accounts.initial_state(),
            categories: self.categories.initial_state(),
            transactions: self.transactions.initial_state(),
            details: self.details.initial_state(),
        })
    }
}

impl Reducer<RootState, Action> for RootReducer {
    fn reduce(&self, state: &Arc<RootState>, action: &Action) -> Arc<RootState> {
        let next = RootState {
            router: self.router.reduce(&state.router, action),
            session: self.session.reduce(&state.session, action),
            accounts: self.accounts.reduce(&state.accounts, action),
            categories: self.categories.reduce(&state.categories, action),
            transactions: self.transactions.reduce(&state.transactions, action),
            details: self.details.reduce(&state.details, action),
        };

        let unchanged = Arc::ptr_eq(&next.router, &state.router)
            && Arc::ptr_eq(&next.session, &state.session)
            && Arc::ptr_eq(&next.accounts, &state.accounts)
            && Arc::ptr_eq(&next.categories, &state.categories)
            && Arc::ptr_eq(&next.transactions, &state.transactions)
            && Arc::ptr_eq(&next.details, &state.details);

        if unchanged {
            Arc::clone(state)
        } else {
            Arc::new(next)
        }
    }
}
