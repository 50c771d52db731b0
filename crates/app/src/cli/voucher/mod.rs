use std::io::Write;

use clap::{Args, Subcommand};
use platter_app::domain::vouchers::VouchersService;

mod list;
mod validate;

#[derive(Debug, Args)]
pub(crate) struct VoucherCommand {
    #[command(subcommand)]
    command: VoucherSubcommand,
}

#[derive(Debug, Subcommand)]
enum VoucherSubcommand {
    /// List vouchers that can be redeemed right now
    List,

    /// Check a code against an order subtotal
    Validate(validate::ValidateArgs),
}

pub(crate) async fn run(
    command: VoucherCommand,
    vouchers: &dyn VouchersService,
    out: &mut dyn Write,
) -> Result<(), String> {
    match command.command {
        VoucherSubcommand::List => list::run(vouchers, out).await,
        VoucherSubcommand::Validate(args) => validate::run(args, vouchers, out).await,
    }
}
