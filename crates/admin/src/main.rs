use clap::Parser;
use wallet_admin::{
    client::Client,
    commands::{Admin, Command},
    config::{self, ConfigArgs},
    error::Result,
};

#[derive(Debug, Parser)]
#[command(name = "wallet_admin")]
#[command(about = "Manage accounts, categories and transactions of a wallet backend")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter(&settings.level))
        .with_writer(std::io::stderr)
        .init();

    let mut admin = Admin::new(Client::new(&settings.base_url)?);
    admin.login(&settings.login, &settings.password).await?;

    let page = admin.run(cli.command).await?;
    print!("{page}");
    Ok(())
}
