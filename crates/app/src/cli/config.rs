//! CLI Config

use clap::Args;
use platter_app::context::{AppContext, AppInitError};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}

/// Database settings.
#[derive(Debug, Args)]
pub(crate) struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub(crate) database_url: String,

    /// Connection pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub(crate) max_connections: u32,
}

impl DatabaseConfig {
    pub(crate) async fn connect(&self) -> Result<AppContext, String> {
        AppContext::from_database_url(&self.database_url, self.max_connections)
            .await
            .map_err(|error| match error {
                AppInitError::Database(source) => {
                    format!("failed to connect to database: {source}")
                }
            })
    }
}
