use clap::{Parser, Subcommand};

use crate::cli::config::{DatabaseConfig, LoggingConfig};

pub(crate) mod config;
mod db;
pub(crate) mod logging;
mod order;
mod voucher;

#[derive(Debug, Parser)]
#[command(name = "platter-app", about = "Platter order engine CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Voucher(voucher::VoucherCommand),
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command, &self.database).await,
            Commands::Voucher(command) => {
                let ctx = self.database.connect().await?;

                voucher::run(command, ctx.vouchers.as_ref(), &mut std::io::stdout().lock()).await
            }
            Commands::Order(command) => {
                let ctx = self.database.connect().await?;

                order::run(command, ctx.orders.as_ref(), &mut std::io::stdout().lock()).await
            }
        }
    }
}

pub(crate) fn output_error(error: std::io::Error) -> String {
    format!("failed to write output: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_voucher_validate_with_global_settings() {
        let cli = Cli::try_parse_from([
            "platter-app",
            "--database-url",
            "postgres://localhost/platter",
            "--log-format",
            "json",
            "voucher",
            "validate",
            "--code",
            "HEMAT20",
            "--subtotal",
            "3000",
        ]);

        assert!(cli.is_ok(), "expected arguments to parse, got {cli:?}");
    }

    #[test]
    fn rejects_negative_subtotals() {
        let cli = Cli::try_parse_from([
            "platter-app",
            "--database-url",
            "postgres://localhost/platter",
            "voucher",
            "validate",
            "--code",
            "HEMAT20",
            "--subtotal",
            "-1",
        ]);

        assert!(cli.is_err(), "expected a negative subtotal to be rejected");
    }
}
