//! Actions: descriptors of an intended or completed state change.
//!
//! Every action has a kind from a fixed vocabulary (see [`ActionKind`]) and
//! a typed payload. Reducers look the kind up in their own table and then
//! pattern match the payload, so a payload of the wrong shape is simply not
//! picked up.

use std::fmt;

use api_types::{
    Id, account::Account, category::Category, detail::TransactionDetail, session::User,
    transaction::Transaction,
};

use crate::{crud::ErrorMap, resource::Resource};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Account,
    Category,
    Transaction,
    Detail,
}

impl ResourceKind {
    pub fn singular(self) -> &'static str {
        match self {
            Self::Account => "ACCOUNT",
            Self::Category => "CATEGORY",
            Self::Transaction => "TRANSACTION",
            Self::Detail => "DETAIL",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Account => "ACCOUNTS",
            Self::Category => "CATEGORIES",
            Self::Transaction => "TRANSACTIONS",
            Self::Detail => "DETAILS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Create,
    Edit,
    Remove,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Self::Get, Self::Create, Self::Edit, Self::Remove];

    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Create => "CREATE",
            Self::Edit => "EDIT",
            Self::Remove => "REMOVE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Request,
    Response,
    Failed,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Self::Request, Self::Response, Self::Failed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Response => "RESPONSE",
            Self::Failed => "FAILED",
        }
    }
}

/// The fixed action vocabulary.
///
/// Displays as the wire-style constant, e.g. `GET_ACCOUNTS_REQUEST` or
/// `EDIT_DETAIL_FAILED`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Crud {
        resource: ResourceKind,
        verb: Verb,
        phase: Phase,
    },
    LoginRequest,
    LoginResponse,
    LoginFailed,
    Unauthorized,
    Logout,
    LocationChange,
}

impl ActionKind {
    pub const fn crud(resource: ResourceKind, verb: Verb, phase: Phase) -> Self {
        Self::Crud {
            resource,
            verb,
            phase,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crud {
                resource,
                verb,
                phase,
            } => {
                let noun = if *verb == Verb::Get {
                    resource.plural()
                } else {
                    resource.singular()
                };
                write!(f, "{}_{}_{}", verb.as_str(), noun, phase.as_str())
            }
            Self::LoginRequest => f.write_str("LOGIN_REQUEST"),
            Self::LoginResponse => f.write_str("LOGIN_RESPONSE"),
            Self::LoginFailed => f.write_str("LOGIN_FAILED"),
            Self::Unauthorized => f.write_str("UNAUTHORIZED"),
            Self::Logout => f.write_str("LOGOUT"),
            Self::LocationChange => f.write_str("LOCATION_CHANGE"),
        }
    }
}

/// Payload carried by a CRUD action.
#[derive(Clone, Debug, PartialEq)]
pub enum CrudPayload<R> {
    Empty,
    Collection(Vec<R>),
    Resource(R),
    /// Only the identifier, used by removals.
    Key(Id),
    Errors(ErrorMap),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceAction<R> {
    pub verb: Verb,
    pub phase: Phase,
    pub payload: CrudPayload<R>,
}

/// Outcome of a successful login.
#[derive(Clone, Debug, PartialEq)]
pub struct Login {
    pub user: User,
    pub token: String,
    /// Unix timestamp in milliseconds.
    pub expires_at: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    LoginRequest,
    LoginResponse(Login),
    LoginFailed(ErrorMap),
    Unauthorized,
    Logout,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouterAction {
    LocationChange(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Accounts(ResourceAction<Account>),
    Categories(ResourceAction<Category>),
    Transactions(ResourceAction<Transaction>),
    Details(ResourceAction<TransactionDetail>),
    Session(SessionAction),
    Router(RouterAction),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        fn crud<R>(resource: ResourceKind, action: &ResourceAction<R>) -> ActionKind {
            ActionKind::crud(resource, action.verb, action.phase)
        }

        match self {
            Self::Accounts(action) => crud(ResourceKind::Account, action),
            Self::Categories(action) => crud(ResourceKind::Category, action),
            Self::Transactions(action) => crud(ResourceKind::Transaction, action),
            Self::Details(action) => crud(ResourceKind::Detail, action),
            Self::Session(action) => match action {
                SessionAction::LoginRequest => ActionKind::LoginRequest,
                SessionAction::LoginResponse(_) => ActionKind::LoginResponse,
                SessionAction::LoginFailed(_) => ActionKind::LoginFailed,
                SessionAction::Unauthorized => ActionKind::Unauthorized,
                SessionAction::Logout => ActionKind::Logout,
            },
            Self::Router(RouterAction::LocationChange(_)) => ActionKind::LocationChange,
        }
    }

    fn crud<R: Resource>(verb: Verb, phase: Phase, payload: CrudPayload<R>) -> Self {
        R::wrap(ResourceAction {
            verb,
            phase,
            payload,
        })
    }

    pub fn request<R: Resource>(verb: Verb) -> Self {
        Self::crud::<R>(verb, Phase::Request, CrudPayload::Empty)
    }

    pub fn failed<R: Resource>(verb: Verb, errors: ErrorMap) -> Self {
        Self::crud::<R>(verb, Phase::Failed, CrudPayload::Errors(errors))
    }

    pub fn collection<R: Resource>(items: Vec<R>) -> Self {
        Self::crud(Verb::Get, Phase::Response, CrudPayload::Collection(items))
    }

    pub fn created<R: Resource>(resource: R) -> Self {
        Self::crud(Verb::Create, Phase::Response, CrudPayload::Resource(resource))
    }

    pub fn edited<R: Resource>(resource: R) -> Self {
        Self::crud(Verb::Edit, Phase::Response, CrudPayload::Resource(resource))
    }

    pub fn removed<R: Resource>(id: Id) -> Self {
        Self::crud::<R>(Verb::Remove, Phase::Response, CrudPayload::Key(id))
    }

    pub fn location_change(path: impl Into<String>) -> Self {
        Self::Router(RouterAction::LocationChange(path.into()))
    }
}
