//! Vouchers service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use platter::vouchers::{VoucherDiscount, VoucherError, evaluate};
use sqlx::{Postgres, Transaction};
use tracing::{debug, warn};

use crate::{
    database::Db,
    domain::vouchers::{
        PgVouchersRepository,
        errors::VouchersServiceError,
        models::{Voucher, VoucherSummary, VoucherValidation},
    },
};

#[derive(Debug, Clone)]
pub struct PgVouchersService {
    db: Db,
    vouchers: PgVouchersRepository,
}

impl PgVouchersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            vouchers: PgVouchersRepository::new(),
        }
    }
}

/// Look up `code` and evaluate it against `subtotal` inside the caller's
/// transaction. Vouchers are never mutated by redemption.
pub(crate) async fn evaluate_code(
    vouchers: &PgVouchersRepository,
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    subtotal: u64,
    point_in_time: Timestamp,
) -> Result<(Voucher, VoucherDiscount), VouchersServiceError> {
    let Some(voucher) = vouchers.find_voucher_by_code(tx, code.trim()).await? else {
        warn!("rejected unknown voucher code");

        return Err(VoucherError::UnknownCode.into());
    };

    match evaluate(&voucher.terms, subtotal, point_in_time) {
        Ok(discount) => {
            debug!(voucher_uuid = %voucher.uuid, discount = discount.amount, "voucher applies");

            Ok((voucher, discount))
        }
        Err(error) => {
            warn!(voucher_uuid = %voucher.uuid, %error, "voucher rejected");

            Err(error.into())
        }
    }
}

#[async_trait]
impl VouchersService for PgVouchersService {
    #[tracing::instrument(name = "vouchers.service.validate", skip(self, code), err)]
    async fn validate(
        &self,
        code: String,
        subtotal: u64,
        point_in_time: Timestamp,
    ) -> Result<VoucherValidation, VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let (voucher, discount) =
            evaluate_code(&self.vouchers, &mut tx, &code, subtotal, point_in_time).await?;

        tx.commit().await?;

        Ok(VoucherValidation {
            voucher: VoucherSummary::from(&voucher),
            discount: discount.amount,
            new_total: discount.discounted_subtotal,
        })
    }

    async fn list_active(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<VoucherSummary>, VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let vouchers = self
            .vouchers
            .list_active_vouchers(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(vouchers.iter().map(VoucherSummary::from).collect())
    }
}

#[automock]
#[async_trait]
pub trait VouchersService: Send + Sync {
    /// Check a code against a delivery-fee-exclusive subtotal.
    async fn validate(
        &self,
        code: String,
        subtotal: u64,
        point_in_time: Timestamp,
    ) -> Result<VoucherValidation, VouchersServiceError>;

    /// Vouchers that are switched on and unexpired at `point_in_time`, by code.
    async fn list_active(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<VoucherSummary>, VouchersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use platter::{errors::ErrorKind, vouchers::DiscountType};
    use testresult::TestResult;

    use crate::test::{TestContext, fixtures::NewTestVoucher};

    use super::*;

    #[tokio::test]
    async fn percentage_discount_is_capped() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.create_voucher(NewTestVoucher {
            max_discount: Some(500),
            ..NewTestVoucher::percentage("HEMAT20", 20)
        })
        .await;

        let validation = ctx
            .vouchers
            .validate("HEMAT20".to_string(), 3000, Timestamp::now())
            .await?;

        assert_eq!(validation.discount, 500);
        assert_eq!(validation.new_total, 2500);
        assert_eq!(validation.voucher.discount_type, DiscountType::Percentage);

        Ok(())
    }

    #[tokio::test]
    async fn fixed_discount_never_exceeds_the_subtotal() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.create_voucher(NewTestVoucher::fixed("POTONG10", 1000))
            .await;

        let validation = ctx
            .vouchers
            .validate("POTONG10".to_string(), 800, Timestamp::now())
            .await?;

        assert_eq!(validation.discount, 800);
        assert_eq!(validation.new_total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_codes_are_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .vouchers
            .validate("NOPE".to_string(), 1000, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(VouchersServiceError::Invalid(VoucherError::UnknownCode))),
            "expected UnknownCode, got {result:?}"
        );
    }

    #[tokio::test]
    async fn expired_and_inactive_vouchers_are_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.create_voucher(NewTestVoucher {
            expires_at: now.checked_sub(1.hour())?,
            ..NewTestVoucher::fixed("OLD", 100)
        })
        .await;

        ctx.create_voucher(NewTestVoucher {
            is_active: false,
            ..NewTestVoucher::fixed("OFF", 100)
        })
        .await;

        for code in ["OLD", "OFF"] {
            let result = ctx.vouchers.validate(code.to_string(), 1000, now).await;

            assert!(
                matches!(result, Err(ref error) if error.kind() == ErrorKind::Unavailable),
                "expected Unavailable for {code}, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn expiry_instant_is_still_valid() -> TestResult {
        let ctx = TestContext::new().await;
        // Whole seconds so the stored value round-trips exactly.
        let expires_at = Timestamp::from_second(Timestamp::now().as_second() + 3600)?;

        ctx.create_voucher(NewTestVoucher {
            expires_at,
            ..NewTestVoucher::fixed("EDGE", 100)
        })
        .await;

        let validation = ctx
            .vouchers
            .validate("EDGE".to_string(), 1000, expires_at)
            .await?;

        assert_eq!(validation.discount, 100);

        Ok(())
    }

    #[tokio::test]
    async fn minimum_order_value_is_enforced() {
        let ctx = TestContext::new().await;

        ctx.create_voucher(NewTestVoucher {
            min_order_value: 5000,
            ..NewTestVoucher::fixed("BIG", 1000)
        })
        .await;

        let result = ctx
            .vouchers
            .validate("BIG".to_string(), 4999, Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(VouchersServiceError::Invalid(VoucherError::BelowMinimumOrder {
                    minimum: 5000,
                    subtotal: 4999
                }))
            ),
            "expected BelowMinimumOrder, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_active_skips_expired_and_inactive() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.create_voucher(NewTestVoucher::fixed("ZETA", 100)).await;
        ctx.create_voucher(NewTestVoucher::percentage("ALPHA", 10))
            .await;
        ctx.create_voucher(NewTestVoucher {
            is_active: false,
            ..NewTestVoucher::fixed("OFF", 100)
        })
        .await;
        ctx.create_voucher(NewTestVoucher {
            expires_at: now.checked_sub(1.minute())?,
            ..NewTestVoucher::fixed("OLD", 100)
        })
        .await;

        let codes: Vec<String> = ctx
            .vouchers
            .list_active(now)
            .await?
            .into_iter()
            .map(|voucher| voucher.code)
            .collect();

        assert_eq!(codes, vec!["ALPHA".to_string(), "ZETA".to_string()]);

        Ok(())
    }
}
