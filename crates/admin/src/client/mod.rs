use api_types::{
    Id,
    account::{Account, AccountDraft, AccountEnvelope, AccountsEnvelope},
    category::{CategoriesEnvelope, Category, CategoryDraft, CategoryEnvelope},
    detail::{DetailDraft, DetailEnvelope, DetailsEnvelope, TransactionDetail},
    errors::ErrorsEnvelope,
    session::{Credentials, TOKEN_EXPIRE_HEADER, TOKEN_HEADER, UserEnvelope},
    transaction::{Transaction, TransactionDraft, TransactionEnvelope, TransactionsEnvelope},
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use store::{ErrorMap, Login, Resource};
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed")]
    Validation(ErrorMap),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Field errors as stored in a collection slice.
    pub fn into_errors(self) -> ErrorMap {
        let message = match self {
            Self::Validation(errors) => return errors,
            Self::Unauthorized => "Access token required".to_string(),
            Self::Forbidden => "Forbidden".to_string(),
            Self::NotFound => "Not found".to_string(),
            Self::Conflict(message) | Self::Server(message) => message,
            Self::Transport(err) => format!("Server unreachable: {err}"),
        };
        ErrorMap::from([("server".to_string(), message)])
    }
}

/// A resource the backend exposes as a collection plus instances.
pub trait RemoteResource: Resource + DeserializeOwned {
    /// Identifies the parent collection (`()` for top-level resources).
    type Parent: Copy + Send + Sync;
    type Draft: Serialize + Send + Sync;
    type Collection: DeserializeOwned;
    type Single: DeserializeOwned;

    fn collection_path(parent: Self::Parent) -> String;

    fn instance_path(parent: Self::Parent, id: Id) -> String {
        format!("{}/{id}", Self::collection_path(parent))
    }

    fn from_collection(envelope: Self::Collection) -> Vec<Self>;

    fn from_single(envelope: Self::Single) -> Self;

    /// The resource as the backend stores it after accepting `draft`.
    fn from_draft(id: Id, draft: &Self::Draft) -> Self;
}

impl RemoteResource for Account {
    type Parent = ();
    type Draft = AccountDraft;
    type Collection = AccountsEnvelope;
    type Single = AccountEnvelope;

    fn collection_path(_: ()) -> String {
        "api/accounts".to_string()
    }

    fn from_collection(envelope: AccountsEnvelope) -> Vec<Self> {
        envelope.accounts
    }

    fn from_single(envelope: AccountEnvelope) -> Self {
        envelope.account
    }

    fn from_draft(id: Id, draft: &AccountDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            balance: None,
        }
    }
}

impl RemoteResource for Category {
    type Parent = ();
    type Draft = CategoryDraft;
    type Collection = CategoriesEnvelope;
    type Single = CategoryEnvelope;

    fn collection_path(_: ()) -> String {
        "api/categories".to_string()
    }

    fn from_collection(envelope: CategoriesEnvelope) -> Vec<Self> {
        envelope.categories
    }

    fn from_single(envelope: CategoryEnvelope) -> Self {
        envelope.category
    }

    fn from_draft(id: Id, draft: &CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
        }
    }
}

impl RemoteResource for Transaction {
    type Parent = ();
    type Draft = TransactionDraft;
    type Collection = TransactionsEnvelope;
    type Single = TransactionEnvelope;

    fn collection_path(_: ()) -> String {
        "api/transactions".to_string()
    }

    fn from_collection(envelope: TransactionsEnvelope) -> Vec<Self> {
        envelope.transactions
    }

    fn from_single(envelope: TransactionEnvelope) -> Self {
        envelope.transaction
    }

    fn from_draft(id: Id, draft: &TransactionDraft) -> Self {
        Self {
            id,
            account_id: draft.account_id,
            category_id: draft.category_id,
            description: draft.description.clone(),
            amount: draft.amount,
            kind: draft.kind,
            created_on: draft.created_on,
        }
    }
}

impl RemoteResource for TransactionDetail {
    /// Owning transaction id.
    type Parent = Id;
    type Draft = DetailDraft;
    type Collection = DetailsEnvelope;
    type Single = DetailEnvelope;

    fn collection_path(transaction_id: Id) -> String {
        format!("api/transactions/{transaction_id}/details")
    }

    fn from_collection(envelope: DetailsEnvelope) -> Vec<Self> {
        envelope.details
    }

    fn from_single(envelope: DetailEnvelope) -> Self {
        envelope.detail
    }

    fn from_draft(id: Id, draft: &DetailDraft) -> Self {
        Self {
            id,
            transaction_id: draft.transaction_id,
            name: draft.name.clone(),
            price_per_unit: draft.price_per_unit,
            count: draft.count,
            total: draft.total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    /// `base_url` may carry a path prefix; endpoints are resolved below it.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("wallet_admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url,
            http,
            token: None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> std::result::Result<RequestBuilder, ClientError> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        let mut builder = self.http.request(method, endpoint);
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        Ok(builder)
    }

    /// Logs in and keeps the access token for the following requests.
    pub async fn login(&mut self, credentials: &Credentials) -> std::result::Result<Login, ClientError> {
        let res = self
            .request(Method::POST, "auth/login")?
            .json(credentials)
            .send()
            .await?;
        let res = check(res).await?;

        let header = |name: &str| {
            res.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let token = header(TOKEN_HEADER)
            .ok_or_else(|| ClientError::Server("missing access token".to_string()))?;
        let expires_at = header(TOKEN_EXPIRE_HEADER).and_then(|value| value.parse().ok());
        let body = res.json::<UserEnvelope>().await?;

        self.token = Some(token.clone());
        Ok(Login {
            user: body.user,
            token,
            expires_at,
        })
    }

    pub async fn list<R: RemoteResource>(
        &self,
        parent: R::Parent,
    ) -> std::result::Result<Vec<R>, ClientError> {
        let res = self
            .request(Method::GET, &R::collection_path(parent))?
            .send()
            .await?;
        let envelope = check(res).await?.json::<R::Collection>().await?;
        Ok(R::from_collection(envelope))
    }

    pub async fn create<R: RemoteResource>(
        &self,
        parent: R::Parent,
        draft: &R::Draft,
    ) -> std::result::Result<R, ClientError> {
        let res = self
            .request(Method::POST, &R::collection_path(parent))?
            .json(draft)
            .send()
            .await?;
        let envelope = check(res).await?.json::<R::Single>().await?;
        Ok(R::from_single(envelope))
    }

    /// Some backends answer an update with `204 No Content`; the submitted
    /// draft is then taken as the new state of the resource.
    pub async fn update<R: RemoteResource>(
        &self,
        parent: R::Parent,
        id: Id,
        draft: &R::Draft,
    ) -> std::result::Result<R, ClientError> {
        let res = self
            .request(Method::PUT, &R::instance_path(parent, id))?
            .json(draft)
            .send()
            .await?;
        let res = check(res).await?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(R::from_draft(id, draft));
        }
        let envelope = res.json::<R::Single>().await?;
        Ok(R::from_single(envelope))
    }

    pub async fn remove<R: RemoteResource>(
        &self,
        parent: R::Parent,
        id: Id,
    ) -> std::result::Result<(), ClientError> {
        let res = self
            .request(Method::DELETE, &R::instance_path(parent, id))?
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

/// Passes successful responses through and maps the others to a
/// [`ClientError`].
async fn check(res: Response) -> std::result::Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    tracing::debug!(%status, %body, "request failed");
    let message = || {
        serde_json::from_str::<ErrorsEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.into_messages().into_values().next())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "unknown error".to_string()
                } else {
                    body.clone()
                }
            })
    };

    let err = match status.as_u16() {
        400 | 422 => match serde_json::from_str::<ErrorsEnvelope>(&body) {
            Ok(envelope) if !envelope.errors.is_empty() => {
                ClientError::Validation(envelope.into_messages())
            }
            _ => ClientError::Validation(ErrorMap::from([("server".to_string(), message())])),
        },
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(message()),
        _ => ClientError::Server(message()),
    };
    Err(err)
}
