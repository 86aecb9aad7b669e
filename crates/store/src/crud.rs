//! Generic CRUD reducer.
//!
//! [`CrudReducer::new`] takes an initial state, a table mapping each action
//! kind it should react to onto a [`CrudOperation`], and optional overrides
//! replacing the default transition of an operation. Kinds missing from the
//! table leave the state untouched, pointer included.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use crate::{
    Reducer,
    action::{Action, ActionKind, CrudPayload, Phase, ResourceKind, Verb},
    resource::Resource,
};

/// Field name to message, as reported by the backend.
pub type ErrorMap = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionState<R> {
    pub is_fetching: bool,
    pub items: Vec<R>,
    pub errors: ErrorMap,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            is_fetching: false,
            items: Vec::new(),
            errors: ErrorMap::new(),
        }
    }
}

impl<R: Resource> CollectionState<R> {
    pub fn find(&self, id: api_types::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    GetCollectionRequest,
    GetCollectionResponse,
    GetCollectionFailed,
    CreateResourceRequest,
    CreateResourceResponse,
    CreateResourceFailed,
    EditResourceRequest,
    EditResourceResponse,
    EditResourceFailed,
    RemoveResourceRequest,
    RemoveResourceResponse,
    RemoveResourceFailed,
}

impl CrudOperation {
    pub fn from_parts(verb: Verb, phase: Phase) -> Self {
        match (verb, phase) {
            (Verb::Get, Phase::Request) => Self::GetCollectionRequest,
            (Verb::Get, Phase::Response) => Self::GetCollectionResponse,
            (Verb::Get, Phase::Failed) => Self::GetCollectionFailed,
            (Verb::Create, Phase::Request) => Self::CreateResourceRequest,
            (Verb::Create, Phase::Response) => Self::CreateResourceResponse,
            (Verb::Create, Phase::Failed) => Self::CreateResourceFailed,
            (Verb::Edit, Phase::Request) => Self::EditResourceRequest,
            (Verb::Edit, Phase::Response) => Self::EditResourceResponse,
            (Verb::Edit, Phase::Failed) => Self::EditResourceFailed,
            (Verb::Remove, Phase::Request) => Self::RemoveResourceRequest,
            (Verb::Remove, Phase::Response) => Self::RemoveResourceResponse,
            (Verb::Remove, Phase::Failed) => Self::RemoveResourceFailed,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Self::GetCollectionRequest
            | Self::CreateResourceRequest
            | Self::EditResourceRequest
            | Self::RemoveResourceRequest => Phase::Request,
            Self::GetCollectionResponse
            | Self::CreateResourceResponse
            | Self::EditResourceResponse
            | Self::RemoveResourceResponse => Phase::Response,
            Self::GetCollectionFailed
            | Self::CreateResourceFailed
            | Self::EditResourceFailed
            | Self::RemoveResourceFailed => Phase::Failed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::GetCollectionRequest => "getCollectionRequest",
            Self::GetCollectionResponse => "getCollectionResponse",
            Self::GetCollectionFailed => "getCollectionFailed",
            Self::CreateResourceRequest => "createResourceRequest",
            Self::CreateResourceResponse => "createResourceResponse",
            Self::CreateResourceFailed => "createResourceFailed",
            Self::EditResourceRequest => "editResourceRequest",
            Self::EditResourceResponse => "editResourceResponse",
            Self::EditResourceFailed => "editResourceFailed",
            Self::RemoveResourceRequest => "removeResourceRequest",
            Self::RemoveResourceResponse => "removeResourceResponse",
            Self::RemoveResourceFailed => "removeResourceFailed",
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A state transition. `None` means "nothing to do" and keeps the old state.
pub type Transition<R> =
    Box<dyn Fn(&CollectionState<R>, &CrudPayload<R>) -> Option<CollectionState<R>> + Send + Sync>;

/// The twelve `<VERB>_<RESOURCE>_<PHASE>` kinds of `resource`, each mapped to
/// its canonical operation.
pub fn standard_operations(resource: ResourceKind) -> HashMap<ActionKind, CrudOperation> {
    let mut operations = HashMap::new();
    for verb in Verb::ALL {
        for phase in Phase::ALL {
            operations.insert(
                ActionKind::crud(resource, verb, phase),
                CrudOperation::from_parts(verb, phase),
            );
        }
    }
    operations
}

pub struct CrudReducer<R: Resource> {
    initial: Arc<CollectionState<R>>,
    operations: HashMap<ActionKind, CrudOperation>,
    overrides: HashMap<CrudOperation, Transition<R>>,
}

impl<R: Resource> CrudReducer<R> {
    pub fn new(
        initial: CollectionState<R>,
        operations: HashMap<ActionKind, CrudOperation>,
        overrides: HashMap<CrudOperation, Transition<R>>,
    ) -> Self {
        Self {
            initial: Arc::new(initial),
            operations,
            overrides,
        }
    }

    /// Empty collection, every standard kind of `R`, no overrides.
    pub fn standard() -> Self {
        Self::new(
            CollectionState::default(),
            standard_operations(R::KIND),
            HashMap::new(),
        )
    }

    pub fn with_override(mut self, operation: CrudOperation, transition: Transition<R>) -> Self {
        self.overrides.insert(operation, transition);
        self
    }

    pub fn initial_state(&self) -> Arc<CollectionState<R>> {
        Arc::clone(&self.initial)
    }

    pub fn operation_for(&self, kind: &ActionKind) -> Option<CrudOperation> {
        self.operations.get(kind).copied()
    }
}

impl<R: Resource> Reducer<CollectionState<R>, Action> for CrudReducer<R> {
    fn reduce(&self, state: &Arc<CollectionState<R>>, action: &Action) -> Arc<CollectionState<R>> {
        let unchanged = || Arc::clone(state);

        let Some(operation) = self.operation_for(&action.kind()) else {
            return unchanged();
        };
        let Some(resource_action) = R::select(action) else {
            return unchanged();
        };

        let next = match self.overrides.get(&operation) {
            Some(transition) => transition(state.as_ref(), &resource_action.payload),
            None => default_transition(operation, state.as_ref(), &resource_action.payload),
        };

        match next {
            Some(next) => Arc::new(next),
            None => {
                tracing::trace!(%operation, "payload does not fit the operation, ignored");
                unchanged()
            }
        }
    }
}

/// The built-in semantics of every CRUD operation.
pub fn default_transition<R: Resource>(
    operation: CrudOperation,
    state: &CollectionState<R>,
    payload: &CrudPayload<R>,
) -> Option<CollectionState<R>> {
    use CrudOperation::*;

    match (operation, payload) {
        (op, _) if op.phase() == Phase::Request => Some(CollectionState {
            is_fetching: true,
            items: state.items.clone(),
            errors: state.errors.clone(),
        }),
        (op, CrudPayload::Errors(errors)) if op.phase() == Phase::Failed => {
            Some(CollectionState {
                is_fetching: false,
                items: state.items.clone(),
                errors: errors.clone(),
            })
        }
        (GetCollectionResponse, CrudPayload::Collection(items)) => Some(settled(items.clone())),
        // Duplicate ids are not guarded against here.
        (CreateResourceResponse, CrudPayload::Resource(resource)) => {
            let mut items = state.items.clone();
            items.push(resource.clone());
            Some(settled(items))
        }
        (EditResourceResponse, CrudPayload::Resource(update)) => Some(settled(
            state
                .items
                .iter()
                .map(|item| {
                    if item.id() == update.id() {
                        item.merge(update)
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        )),
        (RemoveResourceResponse, CrudPayload::Resource(resource)) => {
            Some(settled(without(&state.items, resource.id())))
        }
        (RemoveResourceResponse, CrudPayload::Key(id)) => Some(settled(without(&state.items, *id))),
        _ => None,
    }
}

fn settled<R>(items: Vec<R>) -> CollectionState<R> {
    CollectionState {
        is_fetching: false,
        items,
        errors: ErrorMap::new(),
    }
}

fn without<R: Resource>(items: &[R], id: api_types::Id) -> Vec<R> {
    items.iter().filter(|item| item.id() != id).cloned().collect()
}
