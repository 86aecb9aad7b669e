use clap::Args;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/wallet_admin.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub login: String,
    /// Only read from the config file or `WALLET_ADMIN_PASSWORD`.
    pub password: String,
    /// Log level for the crates of this workspace.
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            login: String::new(),
            password: String::new(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override login (password is never read from CLI).
    #[arg(long, global = true)]
    pub login: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("WALLET_ADMIN"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(login) = &args.login {
        settings.login = login.clone();
    }
    if let Some(level) = &args.level {
        settings.level = level.clone();
    }

    Ok(settings)
}

/// Env filter directive enabling `level` for every crate of the workspace.
pub fn log_filter(level: &str) -> String {
    format!("wallet_admin={level},store={level},api_types={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win_over_defaults() {
        let args = ConfigArgs {
            config: Some("does/not/exist.toml".to_string()),
            base_url: Some("http://wallet.local".to_string()),
            login: Some("alice".to_string()),
            level: None,
        };

        let settings = load(&args).unwrap();
        assert_eq!(settings.base_url, "http://wallet.local");
        assert_eq!(settings.login, "alice");
        assert_eq!(settings.level, "info");
    }

    #[test]
    fn log_filter_lists_every_crate() {
        assert_eq!(
            log_filter("debug"),
            "wallet_admin=debug,store=debug,api_types=debug"
        );
    }
}
