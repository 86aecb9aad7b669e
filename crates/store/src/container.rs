use std::{fmt, sync::Arc};

use crate::{
    Reducer,
    action::Action,
    root::{RootReducer, RootState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S)>;

/// Holds the current state and feeds every dispatched action through the
/// reducer.
///
/// There is no global instance: create one with [`Store::new`] (or
/// [`Store::root`]) and pass it to whoever dispatches.
pub struct Store<S, R> {
    state: Arc<S>,
    reducer: R,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S, R> Store<S, R>
where
    R: Reducer<S, Action>,
{
    pub fn new(initial: Arc<S>, reducer: R) -> Self {
        Self {
            state: initial,
            reducer,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Applies `action` and returns whether the state changed.
    ///
    /// Listeners run only on change, after the new state is in place.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let next = self.reducer.reduce(&self.state, &action);
        let changed = !Arc::ptr_eq(&next, &self.state);
        tracing::debug!(kind = %action.kind(), changed, "dispatch");

        if changed {
            self.state = next;
            for (_, listener) in &mut self.listeners {
                listener(self.state.as_ref());
            }
        }
        changed
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

impl Store<RootState, RootReducer> {
    /// Store over the full application state with the given root reducer.
    pub fn root(reducer: RootReducer) -> Self {
        let initial = reducer.initial_state();
        Self::new(initial, reducer)
    }
}

impl<S: fmt::Debug, R> fmt::Debug for Store<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
