//! Platter Application CLI

use std::process;

use clap::Parser;

use crate::cli::{Cli, logging};

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(init_error) = logging::init_subscriber(&cli.logging) {
        eprintln!("failed to initialise logging: {init_error}");
        process::exit(1);
    }

    if let Err(message) = cli.run().await {
        eprintln!("{message}");
        process::exit(1);
    }
}
