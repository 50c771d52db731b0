use std::io::Write;

use jiff::Timestamp;
use platter_app::domain::vouchers::VouchersService;

use crate::cli::output_error;

pub(crate) async fn run(vouchers: &dyn VouchersService, out: &mut dyn Write) -> Result<(), String> {
    let active = vouchers
        .list_active(Timestamp::now())
        .await
        .map_err(|error| format!("failed to list vouchers: {error}"))?;

    if active.is_empty() {
        writeln!(out, "no active vouchers").map_err(output_error)?;

        return Ok(());
    }

    for voucher in active {
        writeln!(out, "code: {}", voucher.code).map_err(output_error)?;
        writeln!(
            out,
            "description: {}",
            voucher.description.as_deref().unwrap_or("-")
        )
        .map_err(output_error)?;
        writeln!(out, "discount_type: {}", voucher.discount_type).map_err(output_error)?;
        writeln!(out, "discount_value: {}", voucher.discount_value).map_err(output_error)?;
        writeln!(
            out,
            "max_discount: {}",
            voucher
                .max_discount
                .map_or_else(|| "none".to_string(), |value| value.to_string())
        )
        .map_err(output_error)?;
        writeln!(out, "min_order_value: {}", voucher.min_order_value).map_err(output_error)?;
        writeln!(out, "expires_at: {}", voucher.expires_at).map_err(output_error)?;
        writeln!(out).map_err(output_error)?;
    }

    Ok(())
}
