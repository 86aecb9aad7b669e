//! Command line pages.
//!
//! A command loads what its page needs, submits through the action creators
//! and renders the resulting slices. Login happens before, in `main`.

use api_types::{
    Id, account::Account, category::Category, detail::TransactionDetail, session::Credentials,
    transaction::Transaction,
};
use clap::{Args, Subcommand};
use store::{Action, CollectionState, Resource};

use crate::{
    actions::{self, AdminStore},
    client::{Client, RemoteResource},
    error::{AppError, Result},
    forms::{self, DetailInput, FormState, TransactionInput, Validated},
    manage::{self, RouteParams},
    render::{self, Row},
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the session status.
    Login,
    Accounts {
        #[command(subcommand)]
        command: NamedCommand,
    },
    Categories {
        #[command(subcommand)]
        command: NamedCommand,
    },
    Transactions {
        #[command(subcommand)]
        command: TransactionCommand,
    },
    Details(DetailsArgs),
}

/// Commands of resources that only carry a name.
#[derive(Debug, Subcommand)]
pub enum NamedCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
    },
    Edit {
        #[arg(long)]
        id: Id,
        #[arg(long)]
        name: String,
    },
    Remove {
        #[arg(long)]
        id: Id,
    },
}

#[derive(Debug, Default, Args)]
pub struct TransactionFields {
    #[arg(long)]
    pub account: Option<Id>,
    #[arg(long)]
    pub category: Option<Id>,
    #[arg(long)]
    pub amount: Option<String>,
    /// income, expense or transfer
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// e.g. 2016-05-01T10:00:00
    #[arg(long)]
    pub created_on: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum TransactionCommand {
    List,
    Add(TransactionFields),
    Edit {
        #[arg(long)]
        id: Id,
        #[command(flatten)]
        fields: TransactionFields,
    },
    Remove {
        #[arg(long)]
        id: Id,
    },
}

#[derive(Debug, Args)]
pub struct DetailsArgs {
    #[arg(long)]
    pub transaction: Id,
    #[command(subcommand)]
    pub command: DetailCommand,
}

#[derive(Debug, Default, Args)]
pub struct DetailFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price_per_unit: Option<String>,
    #[arg(long)]
    pub count: Option<String>,
    #[arg(long)]
    pub total: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum DetailCommand {
    List,
    Add(DetailFields),
    Edit {
        #[arg(long)]
        id: Id,
        #[command(flatten)]
        fields: DetailFields,
    },
    Remove {
        #[arg(long)]
        id: Id,
    },
}

pub struct Admin {
    pub client: Client,
    pub store: AdminStore,
}

impl Admin {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            store: actions::new_store(),
        }
    }

    pub async fn login(&mut self, login: &str, password: &str) -> Result<()> {
        if login.trim().is_empty() || password.is_empty() {
            return Err(AppError::Usage(
                "login and password are required (config file or WALLET_ADMIN_* env)".to_string(),
            ));
        }
        let credentials = Credentials {
            login: login.trim().to_string(),
            password: password.to_string(),
        };
        if actions::login(&mut self.client, &mut self.store, &credentials).await {
            Ok(())
        } else {
            Err(AppError::Usage(render::session(&self.store.state().session)))
        }
    }

    /// Runs `command` and returns the rendered page.
    pub async fn run(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Login => Ok(render::session(&self.store.state().session)),
            Command::Accounts { command } => {
                self.named::<Account>(command, "Accounts", forms::account)
                    .await
            }
            Command::Categories { command } => {
                self.named::<Category>(command, "Categories", forms::category)
                    .await
            }
            Command::Transactions { command } => self.transactions(command).await,
            Command::Details(args) => self.details(args).await,
        }
    }

    async fn named<R>(
        &mut self,
        command: NamedCommand,
        title: &str,
        validate: impl Fn(&str) -> Validated<R::Draft>,
    ) -> Result<String>
    where
        R: RemoteResource<Parent = ()> + Row,
    {
        match command {
            NamedCommand::List => self.list::<R>((), title, RouteParams::default()).await,
            NamedCommand::Add { name } => {
                let draft = submit_form(validate(&name))?;
                self.create::<R>((), &draft, RouteParams::default()).await
            }
            NamedCommand::Edit { id, name } => {
                let params = RouteParams::instance(Some(id));
                self.load_instance::<R>((), &params).await?;
                let draft = submit_form(validate(&name))?;
                self.edit::<R>((), id, &draft, params).await
            }
            NamedCommand::Remove { id } => {
                self.remove::<R>((), id, RouteParams::instance(Some(id)))
                    .await
            }
        }
    }

    async fn transactions(&mut self, command: TransactionCommand) -> Result<String> {
        match command {
            TransactionCommand::List => {
                self.list::<Transaction>((), "Transactions", RouteParams::default())
                    .await
            }
            TransactionCommand::Add(fields) => {
                let input = transaction_input(None, fields);
                let draft = submit_form(forms::transaction(&input))?;
                self.create::<Transaction>((), &draft, RouteParams::default())
                    .await
            }
            TransactionCommand::Edit { id, fields } => {
                let params = RouteParams::instance(Some(id));
                let current = self.load_instance::<Transaction>((), &params).await?;
                let input = transaction_input(Some(&current), fields);
                let draft = submit_form(forms::transaction(&input))?;
                self.edit::<Transaction>((), id, &draft, params).await
            }
            TransactionCommand::Remove { id } => {
                self.remove::<Transaction>((), id, RouteParams::instance(Some(id)))
                    .await
            }
        }
    }

    async fn details(&mut self, args: DetailsArgs) -> Result<String> {
        let transaction_id = args.transaction;
        let title = format!("Details of transaction #{transaction_id}");
        match args.command {
            DetailCommand::List => {
                self.list::<TransactionDetail>(
                    transaction_id,
                    &title,
                    RouteParams::detail(transaction_id, None),
                )
                .await
            }
            DetailCommand::Add(fields) => {
                let params = RouteParams::detail(transaction_id, None);
                let input = detail_input(manage::transaction_id(&params), None, fields);
                let draft = submit_form(forms::detail(&input))?;
                self.create::<TransactionDetail>(transaction_id, &draft, params)
                    .await
            }
            DetailCommand::Edit { id, fields } => {
                let params = RouteParams::detail(transaction_id, Some(id));
                let current = self
                    .load_instance::<TransactionDetail>(transaction_id, &params)
                    .await?;
                let input = detail_input(manage::transaction_id(&params), Some(&current), fields);
                let draft = submit_form(forms::detail(&input))?;
                self.edit::<TransactionDetail>(transaction_id, id, &draft, params)
                    .await
            }
            DetailCommand::Remove { id } => {
                self.remove::<TransactionDetail>(
                    transaction_id,
                    id,
                    RouteParams::detail(transaction_id, Some(id)),
                )
                .await
            }
        }
    }

    async fn list<R>(&mut self, parent: R::Parent, title: &str, params: RouteParams) -> Result<String>
    where
        R: RemoteResource + Row,
    {
        if !actions::fetch_all::<R>(&self.client, &mut self.store, parent).await {
            return Err(self.failure::<R>(title));
        }
        self.store
            .dispatch(Action::location_change(manage::collection_path(R::KIND, &params)));
        Ok(render::collection(title, slice::<R>(&self.store)))
    }

    async fn load_instance<R>(&mut self, parent: R::Parent, params: &RouteParams) -> Result<R>
    where
        R: RemoteResource,
    {
        actions::fetch_all::<R>(&self.client, &mut self.store, parent).await;
        let collection = slice::<R>(&self.store);
        if !collection.errors.is_empty() {
            return Err(AppError::Usage(render::errors(&collection.errors)));
        }
        manage::find_instance(collection, manage::instance_id(params))
            .cloned()
            .ok_or_else(|| {
                AppError::Usage(format!(
                    "{}: not found",
                    manage::page_title(R::KIND, params)
                ))
            })
    }

    async fn create<R>(&mut self, parent: R::Parent, draft: &R::Draft, params: RouteParams) -> Result<String>
    where
        R: RemoteResource + Row,
    {
        let title = manage::page_title(R::KIND, &params);
        match actions::create::<R>(&self.client, &mut self.store, parent, draft).await {
            Some(created) => {
                self.redirect::<R>(&params);
                Ok(render::page(
                    &title,
                    Some(&created),
                    &[manage::left_link(R::KIND, &params)],
                ))
            }
            None => Err(self.failure::<R>(&title)),
        }
    }

    async fn edit<R>(
        &mut self,
        parent: R::Parent,
        id: Id,
        draft: &R::Draft,
        params: RouteParams,
    ) -> Result<String>
    where
        R: RemoteResource + Row,
    {
        let title = manage::page_title(R::KIND, &params);
        match actions::edit::<R>(&self.client, &mut self.store, parent, id, draft).await {
            Some(_) => {
                self.redirect::<R>(&params);
                let instance = manage::find_instance(slice::<R>(&self.store), Some(id));
                let mut links = vec![manage::left_link(R::KIND, &params)];
                if let Some(instance) = instance {
                    links.push(manage::right_link(&params, instance));
                }
                Ok(render::page(&title, instance, &links))
            }
            None => Err(self.failure::<R>(&title)),
        }
    }

    async fn remove<R>(&mut self, parent: R::Parent, id: Id, params: RouteParams) -> Result<String>
    where
        R: RemoteResource + Row,
    {
        if actions::remove::<R>(&self.client, &mut self.store, parent, id).await {
            self.redirect::<R>(&params);
            Ok(format!("removed #{id}\n"))
        } else {
            Err(self.failure::<R>(&format!("Remove #{id}")))
        }
    }

    fn redirect<R: Resource>(&mut self, params: &RouteParams) {
        self.store
            .dispatch(Action::location_change(manage::done_redirect(R::KIND, params)));
    }

    fn failure<R: RemoteResource>(&self, title: &str) -> AppError {
        AppError::Usage(format!(
            "{title} failed\n{}",
            render::errors(&slice::<R>(&self.store).errors)
        ))
    }
}

/// The slice holding `R` in the root state.
pub fn slice<R: Resource>(store: &AdminStore) -> &CollectionState<R> {
    R::slice(store.state())
}

fn submit_form<T>(validated: Validated<T>) -> Result<T> {
    let mut form = FormState::default();
    form.submit(validated)
        .ok_or_else(|| AppError::Usage(render::form_errors(&form.errors)))
}

fn transaction_input(current: Option<&Transaction>, fields: TransactionFields) -> TransactionInput {
    TransactionInput {
        account_id: fields.account.or(current.map(|tx| tx.account_id)),
        category_id: fields.category.or(current.map(|tx| tx.category_id)),
        description: fields
            .description
            .or_else(|| current.and_then(|tx| tx.description.clone())),
        amount: fields
            .amount
            .or_else(|| current.map(|tx| tx.amount.to_string()))
            .unwrap_or_default(),
        kind: fields
            .kind
            .or_else(|| current.map(|tx| tx.kind.as_str().to_string()))
            .unwrap_or_default(),
        created_on: fields.created_on.or_else(|| {
            current
                .and_then(|tx| tx.created_on)
                .map(|date| date.format("%Y-%m-%dT%H:%M:%S").to_string())
        }),
    }
}

fn detail_input(
    transaction_id: Id,
    current: Option<&TransactionDetail>,
    fields: DetailFields,
) -> DetailInput {
    DetailInput {
        transaction_id,
        name: fields
            .name
            .or_else(|| current.map(|d| d.name.clone()))
            .unwrap_or_default(),
        price_per_unit: fields
            .price_per_unit
            .or_else(|| current.and_then(|d| d.price_per_unit).map(|p| p.to_string())),
        count: fields
            .count
            .or_else(|| current.and_then(|d| d.count).map(|c| c.to_string())),
        total: fields
            .total
            .or_else(|| current.map(|d| d.total.to_string()))
            .unwrap_or_default(),
    }
}
