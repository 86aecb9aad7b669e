//! Action creators.
//!
//! Each one dispatches the `*_REQUEST` action, awaits the backend and then
//! dispatches either `*_RESPONSE` or `*_FAILED` on the same store. A `401`
//! additionally drops the session through `UNAUTHORIZED`.

use api_types::{Id, session::Credentials};
use store::{Action, RootReducer, RootState, SessionAction, Store, Verb};

use crate::client::{Client, ClientError, RemoteResource};

pub type AdminStore = Store<RootState, RootReducer>;

pub fn new_store() -> AdminStore {
    Store::root(RootReducer::new())
}

pub async fn login(client: &mut Client, store: &mut AdminStore, credentials: &Credentials) -> bool {
    store.dispatch(Action::Session(SessionAction::LoginRequest));
    match client.login(credentials).await {
        Ok(login) => {
            tracing::info!(login = %login.user.login, "logged in");
            store.dispatch(Action::Session(SessionAction::LoginResponse(login)));
            true
        }
        Err(err) => {
            tracing::debug!("login failed: {err}");
            store.dispatch(Action::Session(SessionAction::LoginFailed(err.into_errors())));
            false
        }
    }
}

pub fn logout(client: &mut Client, store: &mut AdminStore) {
    client.set_token(None);
    store.dispatch(Action::Session(SessionAction::Logout));
}

pub async fn fetch_all<R: RemoteResource>(
    client: &Client,
    store: &mut AdminStore,
    parent: R::Parent,
) -> bool {
    store.dispatch(Action::request::<R>(Verb::Get));
    match client.list::<R>(parent).await {
        Ok(items) => {
            store.dispatch(Action::collection(items));
            true
        }
        Err(err) => fail::<R>(store, Verb::Get, err),
    }
}

pub async fn create<R: RemoteResource>(
    client: &Client,
    store: &mut AdminStore,
    parent: R::Parent,
    draft: &R::Draft,
) -> Option<R> {
    store.dispatch(Action::request::<R>(Verb::Create));
    match client.create::<R>(parent, draft).await {
        Ok(resource) => {
            store.dispatch(Action::created(resource.clone()));
            Some(resource)
        }
        Err(err) => {
            fail::<R>(store, Verb::Create, err);
            None
        }
    }
}

pub async fn edit<R: RemoteResource>(
    client: &Client,
    store: &mut AdminStore,
    parent: R::Parent,
    id: Id,
    draft: &R::Draft,
) -> Option<R> {
    store.dispatch(Action::request::<R>(Verb::Edit));
    match client.update::<R>(parent, id, draft).await {
        Ok(resource) => {
            store.dispatch(Action::edited(resource.clone()));
            Some(resource)
        }
        Err(err) => {
            fail::<R>(store, Verb::Edit, err);
            None
        }
    }
}

pub async fn remove<R: RemoteResource>(
    client: &Client,
    store: &mut AdminStore,
    parent: R::Parent,
    id: Id,
) -> bool {
    store.dispatch(Action::request::<R>(Verb::Remove));
    match client.remove::<R>(parent, id).await {
        Ok(()) => {
            store.dispatch(Action::removed::<R>(id));
            true
        }
        Err(err) => fail::<R>(store, Verb::Remove, err),
    }
}

fn fail<R: RemoteResource>(store: &mut AdminStore, verb: Verb, err: ClientError) -> bool {
    tracing::debug!(resource = ?R::KIND, ?verb, "request failed: {err}");
    let unauthorized = matches!(err, ClientError::Unauthorized);
    store.dispatch(Action::failed::<R>(verb, err.into_errors()));
    if unauthorized {
        store.dispatch(Action::Session(SessionAction::Unauthorized));
    }
    false
}
