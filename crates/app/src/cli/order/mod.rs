use std::io::Write;

use clap::{Args, Subcommand};
use platter_app::domain::orders::OrdersService;

mod track;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Print the customer tracking view of an order as JSON
    Track(track::TrackArgs),
}

pub(crate) async fn run(
    command: OrderCommand,
    orders: &dyn OrdersService,
    out: &mut dyn Write,
) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Track(args) => track::run(args, orders, out).await,
    }
}
