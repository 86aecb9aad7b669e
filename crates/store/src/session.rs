use std::sync::Arc;

use api_types::session::User;

use crate::{
    Reducer,
    action::{Action, SessionAction},
    crud::ErrorMap,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unauthorized,
    Authorized,
    LoginRequestSend,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Authorized => "AUTHORIZED",
            Self::LoginRequestSend => "LOGIN_REQUEST_SEND",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub user: Option<User>,
    pub token: Option<String>,
    /// Unix timestamp in milliseconds.
    pub expires_at: Option<i64>,
    pub errors: ErrorMap,
}

impl SessionState {
    pub fn is_authorized(&self) -> bool {
        self.status == SessionStatus::Authorized
    }
}

#[derive(Debug, Default)]
pub struct SessionReducer;

impl Reducer<SessionState, Action> for SessionReducer {
    fn reduce(&self, state: &Arc<SessionState>, action: &Action) -> Arc<SessionState> {
        let Action::Session(action) = action else {
            return Arc::clone(state);
        };

        let next = match action {
            SessionAction::LoginRequest => SessionState {
                status: SessionStatus::LoginRequestSend,
                ..SessionState::default()
            },
            SessionAction::LoginResponse(login) => SessionState {
                status: SessionStatus::Authorized,
                user: Some(login.user.clone()),
                token: Some(login.token.clone()),
                expires_at: login.expires_at,
                errors: ErrorMap::new(),
            },
            SessionAction::LoginFailed(errors) => SessionState {
                errors: errors.clone(),
                ..SessionState::default()
            },
            SessionAction::Unauthorized | SessionAction::Logout => SessionState::default(),
        };
        Arc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Login;

    fn login() -> Login {
        Login {
            user: User {
                id: 1,
                login: "alice".to_string(),
            },
            token: "token".to_string(),
            expires_at: Some(1_700_000_000_000),
        }
    }

    #[test]
    fn login_flow_reaches_authorized() {
        let reducer = SessionReducer;
        let state = Arc::new(SessionState::default());

        let state = reducer.reduce(&state, &Action::Session(SessionAction::LoginRequest));
        assert_eq!(state.status, SessionStatus::LoginRequestSend);

        let state = reducer.reduce(&state, &Action::Session(SessionAction::LoginResponse(login())));
        assert!(state.is_authorized());
        assert_eq!(state.token.as_deref(), Some("token"));
        assert_eq!(state.user.as_ref().map(|u| u.login.as_str()), Some("alice"));
    }

    #[test]
    fn new_login_request_forgets_the_previous_user() {
        let reducer = SessionReducer;
        let authorized = reducer.reduce(
            &Arc::new(SessionState::default()),
            &Action::Session(SessionAction::LoginResponse(login())),
        );

        let state = reducer.reduce(&authorized, &Action::Session(SessionAction::LoginRequest));
        assert_eq!(state.status, SessionStatus::LoginRequestSend);
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(state.expires_at.is_none());
    }

    #[test]
    fn login_failed_keeps_errors_and_drops_credentials() {
        let reducer = SessionReducer;
        let mut errors = ErrorMap::new();
        errors.insert("password".to_string(), "Wrong password".to_string());
        let state = Arc::new(SessionState::default());

        let state = reducer.reduce(&state, &Action::Session(SessionAction::LoginFailed(errors.clone())));
        assert_eq!(state.status, SessionStatus::Unauthorized);
        assert_eq!(state.errors, errors);
        assert!(state.token.is_none());
    }

    #[test]
    fn unauthorized_and_logout_clear_the_session() {
        let reducer = SessionReducer;
        let authorized = reducer.reduce(
            &Arc::new(SessionState::default()),
            &Action::Session(SessionAction::LoginResponse(login())),
        );

        for action in [SessionAction::Unauthorized, SessionAction::Logout] {
            let state = reducer.reduce(&authorized, &Action::Session(action));
            assert_eq!(*state, SessionState::default());
        }
    }

    #[test]
    fn other_actions_keep_the_pointer() {
        let reducer = SessionReducer;
        let state = Arc::new(SessionState::default());
        let next = reducer.reduce(&state, &Action::location_change("/"));
        assert!(Arc::ptr_eq(&state, &next));
    }
}
