use std::io::Write;

use clap::Args;
use jiff::Timestamp;
use platter_app::domain::vouchers::VouchersService;

use crate::cli::output_error;

#[derive(Debug, Args)]
pub(crate) struct ValidateArgs {
    /// Voucher code
    #[arg(long)]
    code: String,

    /// Order subtotal in minor units, excluding delivery
    #[arg(long)]
    subtotal: u64,
}

pub(crate) async fn run(
    args: ValidateArgs,
    vouchers: &dyn VouchersService,
    out: &mut dyn Write,
) -> Result<(), String> {
    let validation = vouchers
        .validate(args.code, args.subtotal, Timestamp::now())
        .await
        .map_err(|error| format!("voucher rejected ({}): {error}", error.kind()))?;

    writeln!(out, "code: {}", validation.voucher.code).map_err(output_error)?;
    writeln!(out, "discount: {}", validation.discount).map_err(output_error)?;
    writeln!(out, "new_total: {}", validation.new_total).map_err(output_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use platter::vouchers::{DiscountType, VoucherError};
    use platter_app::domain::vouchers::{
        MockVouchersService, VouchersServiceError,
        models::{VoucherSummary, VoucherValidation},
    };
    use testresult::TestResult;

    use super::*;

    fn args(code: &str, subtotal: u64) -> ValidateArgs {
        ValidateArgs {
            code: code.to_string(),
            subtotal,
        }
    }

    #[tokio::test]
    async fn prints_the_discount() -> TestResult {
        let mut vouchers = MockVouchersService::new();

        vouchers
            .expect_validate()
            .withf(|code, subtotal, _| code == "POTONG10" && *subtotal == 800)
            .times(1)
            .returning(|code, _, _| {
                Ok(VoucherValidation {
                    voucher: VoucherSummary {
                        code,
                        description: None,
                        discount_type: DiscountType::Fixed,
                        discount_value: 1000,
                        max_discount: None,
                        min_order_value: 0,
                        expires_at: Timestamp::UNIX_EPOCH,
                    },
                    discount: 800,
                    new_total: 0,
                })
            });

        let mut out = Vec::new();

        run(args("POTONG10", 800), &vouchers, &mut out).await?;

        assert_eq!(
            String::from_utf8(out)?,
            "code: POTONG10\ndiscount: 800\nnew_total: 0\n"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reports_rejections() {
        let mut vouchers = MockVouchersService::new();

        vouchers
            .expect_validate()
            .times(1)
            .returning(|_, _, _| Err(VouchersServiceError::Invalid(VoucherError::UnknownCode)));

        let mut out = Vec::new();

        let result = run(args("NOPE", 1000), &vouchers, &mut out).await;

        assert!(
            matches!(result, Err(ref message) if message.starts_with("voucher rejected")),
            "expected a rejection message, got {result:?}"
        );
        assert!(out.is_empty(), "nothing should be printed on rejection");
    }
}
