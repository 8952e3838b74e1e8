use serde::Deserialize;

use engine::MissingAccountPolicy;

use crate::{cli::Cli, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/libretto.toml";
const ENV_PREFIX: &str = "LIBRETTO";

/// Where the ledger lives.
///
/// `memory` keeps everything in an in-memory sqlite database, any other
/// value is a sqlite file path (created if missing).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl From<String> for Database {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Sqlite(value)
        }
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: Database,
    pub log_level: String,
    pub missing_account_policy: MissingAccountPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: Database::Sqlite("libretto.db".to_string()),
            log_level: "info".to_string(),
            missing_account_policy: MissingAccountPolicy::default(),
        }
    }
}

impl Settings {
    /// Config file, then `LIBRETTO_*` environment variables, then CLI flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut builder = config::Config::builder();
        builder = builder.add_source(config::File::with_name(config_path).required(false));
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
        let mut settings: Settings = builder.build()?.try_deserialize()?;

        if let Some(database) = &cli.database {
            settings.database = Database::from(database.clone());
        }
        if let Some(level) = &cli.log_level {
            settings.log_level = level.clone();
        }
        if let Some(policy) = cli.missing_account_policy {
            settings.missing_account_policy = policy;
        }

        Ok(settings)
    }
}
