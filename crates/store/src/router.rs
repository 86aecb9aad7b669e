use std::sync::Arc;

use crate::{
    Reducer,
    action::{Action, RouterAction},
};

pub const ROOT_PATH: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterState {
    pub location: String,
    pub previous: Option<String>,
}

impl Default for RouterState {
    fn default() -> Self {
        Self {
            location: ROOT_PATH.to_string(),
            previous: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RouterReducer;

impl Reducer<RouterState, Action> for RouterReducer {
    fn reduce(&self, state: &Arc<RouterState>, action: &Action) -> Arc<RouterState> {
        match action {
            Action::Router(RouterAction::LocationChange(path)) => Arc::new(RouterState {
                location: path.clone(),
                previous: Some(state.location.clone()),
            }),
            _ => Arc::clone(state),
        }
    }
}
