use clap::{Args, Subcommand};
use platter_app::database;
use tracing::info;

use crate::cli::config::DatabaseConfig;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate,
}

pub(crate) async fn run(command: DbCommand, config: &DatabaseConfig) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate => {
            let pool = database::connect(&config.database_url, config.max_connections)
                .await
                .map_err(|error| format!("failed to connect to database: {error}"))?;

            database::migrate(&pool)
                .await
                .map_err(|error| format!("failed to apply migrations: {error}"))?;

            info!("migrations applied");

            Ok(())
        }
    }
}
