use clap::Parser;
use migration::{Migrator, MigratorTrait};

use crate::{
    cli::Cli,
    error::{AppError, Result},
    settings::{Database, Settings},
};

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "libretto={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))?;

    let db = connect(&settings.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .missing_account_policy(settings.missing_account_policy)
        .build()
        .await?;

    commands::run(&engine, cli.command).await
}

async fn connect(config: &Database) -> Result<sea_orm::DatabaseConnection> {
    tracing::debug!(url = %config.url(), "opening database");
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
