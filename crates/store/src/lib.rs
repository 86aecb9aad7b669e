//! Unidirectional state container for the wallet admin.
//!
//! Action creators build an [`Action`], the [`Store`] runs it through the
//! [`RootReducer`], every slice reducer returns either the very same slice
//! (nothing to do) or a freshly built one, and views re-render from the new
//! [`RootState`].
//!
//! ```rust
//! use api_types::account::Account;
//! use store::{Action, RootReducer, Store};
//!
//! let mut store = Store::root(RootReducer::new());
//! store.dispatch(Action::created(Account { id: 1, name: "A".into(), balance: None }));
//! assert_eq!(store.state().accounts.items.len(), 1);
//! ```

use std::sync::Arc;

pub mod action;
pub mod container;
pub mod crud;
pub mod resource;
pub mod root;
pub mod router;
pub mod session;

pub use action::{
    Action, ActionKind, CrudPayload, Login, Phase, ResourceAction, ResourceKind, RouterAction,
    SessionAction, Verb,
};
pub use container::{Store, SubscriptionId};
pub use crud::{CollectionState, CrudOperation, CrudReducer, ErrorMap, Transition};
pub use resource::Resource;
pub use root::{RootReducer, RootState};
pub use router::RouterState;
pub use session::{SessionState, SessionStatus};

/// A pure state transition over a shared slice.
///
/// Returning a clone of `state` (same pointer) signals "unchanged".
pub trait Reducer<S, A> {
    fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&Arc<S>, &A) -> Arc<S>,
{
    fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S> {
        self(state, action)
    }
}
