use std::sync::{Arc, Mutex};

use api_types::{
    Amount, Id,
    account::{Account, AccountDraft, AccountEnvelope, AccountsEnvelope},
    detail::{DetailDraft, DetailEnvelope, DetailsEnvelope, TransactionDetail},
    session::{Credentials, TOKEN_EXPIRE_HEADER, TOKEN_HEADER, User, UserEnvelope},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use store::{Action, SessionStatus};
use wallet_admin::{
    actions,
    client::Client,
    commands::{Admin, Command, DetailCommand, DetailFields, DetailsArgs, NamedCommand},
    error::AppError,
};

const TOKEN: &str = "token-1";

#[derive(Clone, Default)]
struct Backend {
    accounts: Arc<Mutex<Vec<Account>>>,
    details: Arc<Mutex<Vec<TransactionDetail>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some(TOKEN)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "errors": { "server": "Access token required" } })),
    )
        .into_response()
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.password != "secret" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "password": "Wrong password" } })),
        )
            .into_response();
    }
    (
        [(TOKEN_HEADER, TOKEN), (TOKEN_EXPIRE_HEADER, "1700000000000")],
        Json(UserEnvelope {
            user: User {
                id: 1,
                login: credentials.login,
            },
        }),
    )
        .into_response()
}

async fn list_accounts(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let accounts = backend.accounts.lock().unwrap().clone();
    Json(AccountsEnvelope { accounts }).into_response()
}

async fn create_account(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(draft): Json<AccountDraft>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut accounts = backend.accounts.lock().unwrap();
    let account = Account {
        id: accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1,
        name: draft.name,
        balance: None,
    };
    accounts.push(account.clone());
    Json(AccountEnvelope { account }).into_response()
}

async fn update_account(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(draft): Json<AccountDraft>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut accounts = backend.accounts.lock().unwrap();
    match accounts.iter_mut().find(|a| a.id == id) {
        Some(account) => {
            account.name = draft.name;
            Json(AccountEnvelope {
                account: account.clone(),
            })
            .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_account(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.accounts.lock().unwrap().retain(|a| a.id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_categories() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "errors": { "server": "Internal error" } })),
    )
        .into_response()
}

async fn list_details(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(transaction_id): Path<Id>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let details = backend
        .details
        .lock()
        .unwrap()
        .iter()
        .filter(|d| d.transaction_id == transaction_id)
        .cloned()
        .collect();
    Json(DetailsEnvelope { details }).into_response()
}

async fn create_detail(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(transaction_id): Path<Id>,
    Json(draft): Json<DetailDraft>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if draft.total.is_zero() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": { "total": ["must be positive"] } })),
        )
            .into_response();
    }
    let mut details = backend.details.lock().unwrap();
    let detail = TransactionDetail {
        id: details.iter().map(|d| d.id).max().unwrap_or(0) + 1,
        transaction_id,
        name: draft.name,
        price_per_unit: draft.price_per_unit,
        count: draft.count,
        total: draft.total,
    };
    details.push(detail.clone());
    Json(DetailEnvelope { detail }).into_response()
}

/// Answers like the backends that do not echo updates.
async fn update_detail(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path((_, id)): Path<(Id, Id)>,
    Json(draft): Json<DetailDraft>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut details = backend.details.lock().unwrap();
    if let Some(detail) = details.iter_mut().find(|d| d.id == id) {
        detail.name = draft.name;
        detail.total = draft.total;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route(
            "/api/accounts/{id}",
            put(update_account).delete(delete_account),
        )
        .route("/api/categories", get(list_categories))
        .route(
            "/api/transactions/{transaction_id}/details",
            get(list_details).post(create_detail),
        )
        .route(
            "/api/transactions/{transaction_id}/details/{id}",
            put(update_detail),
        )
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn seeded() -> Backend {
    let backend = Backend::default();
    backend.accounts.lock().unwrap().push(Account {
        id: 1,
        name: "Cash".to_string(),
        balance: None,
    });
    backend.details.lock().unwrap().push(TransactionDetail {
        id: 1,
        transaction_id: 3,
        name: "Milk".to_string(),
        price_per_unit: Some(Amount::new(120)),
        count: Some(2.0),
        total: Amount::new(240),
    });
    backend
}

async fn logged_in(backend: Backend) -> Admin {
    let url = spawn_backend(backend).await;
    let mut admin = Admin::new(Client::new(&url).unwrap());
    admin.login("alice", "secret").await.unwrap();
    admin
}

#[tokio::test]
async fn login_stores_the_session_and_token() {
    let admin = logged_in(seeded()).await;

    let session = &admin.store.state().session;
    assert_eq!(session.status, SessionStatus::Authorized);
    assert_eq!(session.user.as_ref().map(|u| u.login.as_str()), Some("alice"));
    assert_eq!(session.token.as_deref(), Some(TOKEN));
    assert_eq!(session.expires_at, Some(1_700_000_000_000));
    assert_eq!(admin.client.token(), Some(TOKEN));
}

#[tokio::test]
async fn wrong_password_keeps_the_backend_errors() {
    let url = spawn_backend(seeded()).await;
    let mut admin = Admin::new(Client::new(&url).unwrap());

    let err = admin.login("alice", "nope").await.unwrap_err();
    assert!(matches!(err, AppError::Usage(_)));

    let session = &admin.store.state().session;
    assert_eq!(session.status, SessionStatus::Unauthorized);
    assert_eq!(session.errors["password"], "Wrong password");
    assert!(admin.client.token().is_none());
}

#[tokio::test]
async fn accounts_round_trip_through_the_store() {
    let mut admin = logged_in(seeded()).await;

    let page = admin
        .run(Command::Accounts {
            command: NamedCommand::List,
        })
        .await
        .unwrap();
    assert!(page.contains("Cash"));
    assert_eq!(admin.store.state().router.location, "/accounts");

    admin
        .run(Command::Accounts {
            command: NamedCommand::Add {
                name: " Bank ".to_string(),
            },
        })
        .await
        .unwrap();
    let accounts = &admin.store.state().accounts;
    assert_eq!(accounts.items.len(), 2);
    assert_eq!(accounts.items[1].name, "Bank");
    assert!(!accounts.is_fetching);

    let page = admin
        .run(Command::Accounts {
            command: NamedCommand::Edit {
                id: 2,
                name: "Savings".to_string(),
            },
        })
        .await
        .unwrap();
    assert!(page.starts_with("Edit account\n"));
    assert!(page.contains("[Remove] /accounts/2/remove"));
    assert_eq!(admin.store.state().accounts.items[1].name, "Savings");

    admin
        .run(Command::Accounts {
            command: NamedCommand::Remove { id: 1 },
        })
        .await
        .unwrap();
    let accounts = &admin.store.state().accounts;
    assert_eq!(accounts.items.len(), 1);
    assert_eq!(accounts.items[0].id, 2);
}

#[tokio::test]
async fn edit_loads_the_account_first() {
    let mut admin = logged_in(seeded()).await;

    let page = admin
        .run(Command::Accounts {
            command: NamedCommand::Edit {
                id: 1,
                name: "Wallet".to_string(),
            },
        })
        .await
        .unwrap();

    assert!(page.contains("Wallet"));
    assert!(page.contains("[Remove] /accounts/1/remove"));
    let accounts = &admin.store.state().accounts;
    assert_eq!(accounts.items.len(), 1);
    assert_eq!(accounts.items[0].name, "Wallet");
}

#[tokio::test]
async fn edit_of_unknown_account_is_rejected() {
    let mut admin = logged_in(seeded()).await;

    let err = admin
        .run(Command::Accounts {
            command: NamedCommand::Edit {
                id: 9,
                name: "Ghost".to_string(),
            },
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Edit account: not found");
    assert_eq!(admin.store.state().accounts.items[0].name, "Cash");
}

#[tokio::test]
async fn logout_forgets_the_token() {
    let mut admin = logged_in(seeded()).await;

    actions::logout(&mut admin.client, &mut admin.store);

    assert!(admin.client.token().is_none());
    let session = &admin.store.state().session;
    assert_eq!(session.status, SessionStatus::Unauthorized);
    assert!(session.user.is_none());

    let ok = actions::fetch_all::<Account>(&admin.client, &mut admin.store, ()).await;
    assert!(!ok);
    assert_eq!(
        admin.store.state().accounts.errors["server"],
        "Access token required"
    );
}

#[tokio::test]
async fn invalid_form_dispatches_nothing() {
    let mut admin = logged_in(seeded()).await;
    let before = Arc::clone(admin.store.state());

    let err = admin
        .run(Command::Accounts {
            command: NamedCommand::Add {
                name: "   ".to_string(),
            },
        })
        .await
        .unwrap_err();

    match err {
        AppError::Usage(message) => assert!(message.contains("Name could not be empty")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(Arc::ptr_eq(&before, admin.store.state()));
}

#[tokio::test]
async fn server_error_lands_in_the_slice() {
    let mut admin = logged_in(seeded()).await;

    let err = admin
        .run(Command::Categories {
            command: NamedCommand::List,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Usage(_)));
    assert!(err.to_string().starts_with("Categories failed\n"));
    assert!(err.to_string().contains("! server: Internal error"));
    assert_eq!(admin.store.state().router.location, "/");
    let categories = &admin.store.state().categories;
    assert!(!categories.is_fetching);
    assert!(categories.items.is_empty());
}

#[tokio::test]
async fn rejected_token_drops_the_session() {
    let mut admin = logged_in(seeded()).await;
    admin.client.set_token(Some("stale".to_string()));

    let ok = actions::fetch_all::<Account>(&admin.client, &mut admin.store, ()).await;

    assert!(!ok);
    let state = admin.store.state();
    assert_eq!(state.session.status, SessionStatus::Unauthorized);
    assert!(state.session.token.is_none());
    assert_eq!(state.accounts.errors["server"], "Access token required");
}

#[tokio::test]
async fn detail_update_without_body_uses_the_draft() {
    let mut admin = logged_in(seeded()).await;

    let page = admin
        .run(Command::Details(DetailsArgs {
            transaction: 3,
            command: DetailCommand::Edit {
                id: 1,
                fields: DetailFields {
                    name: Some("Oat milk".to_string()),
                    total: Some("3.10".to_string()),
                    ..DetailFields::default()
                },
            },
        }))
        .await
        .unwrap();

    assert!(page.contains("Oat milk"));
    let detail = &admin.store.state().details.items[0];
    assert_eq!(detail.total, Amount::new(310));
    assert_eq!(detail.price_per_unit, Some(Amount::new(120)));
    assert_eq!(admin.store.state().router.location, "/transactions/3/details");
}

#[tokio::test]
async fn rejected_detail_keeps_field_errors() {
    let mut admin = logged_in(seeded()).await;
    admin
        .run(Command::Details(DetailsArgs {
            transaction: 3,
            command: DetailCommand::List,
        }))
        .await
        .unwrap();

    let err = admin
        .run(Command::Details(DetailsArgs {
            transaction: 3,
            command: DetailCommand::Add(DetailFields {
                name: Some("Bread".to_string()),
                total: Some("0".to_string()),
                ..DetailFields::default()
            }),
        }))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("total: must be positive"));
    let details = &admin.store.state().details;
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.errors["total"], "must be positive");
}

#[tokio::test]
async fn listeners_see_each_change() {
    let mut admin = logged_in(seeded()).await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    admin.store.subscribe(move |state| {
        sink.lock().unwrap().push(state.accounts.is_fetching);
    });

    actions::fetch_all::<Account>(&admin.client, &mut admin.store, ()).await;
    admin.store.dispatch(Action::location_change("/accounts"));
    admin.store.dispatch(Action::location_change("/accounts"));

    assert_eq!(*seen.lock().unwrap(), [true, false, false, false]);
}
