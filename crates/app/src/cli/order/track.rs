use std::io::Write;

use clap::Args;
use jiff::Timestamp;
use platter_app::domain::orders::OrdersService;
use uuid::Uuid;

use crate::cli::output_error;

#[derive(Debug, Args)]
pub(crate) struct TrackArgs {
    /// Order UUID
    #[arg(long)]
    order: Uuid,

    /// UUID of the customer who placed the order
    #[arg(long)]
    user: Uuid,
}

pub(crate) async fn run(
    args: TrackArgs,
    orders: &dyn OrdersService,
    out: &mut dyn Write,
) -> Result<(), String> {
    let tracking = orders
        .track(args.order.into(), args.user.into(), Timestamp::now())
        .await
        .map_err(|error| format!("failed to track order ({}): {error}", error.kind()))?;

    serde_json::to_writer_pretty(&mut *out, &tracking)
        .map_err(|error| format!("failed to serialise tracking view: {error}"))?;

    writeln!(out).map_err(output_error)
}

#[cfg(test)]
mod tests {
    use platter::{pricing::OrderTotals, status::OrderStatus, tracking::timeline};
    use platter_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        models::{OrderTracking, OrderUuid, PaymentMethod},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn prints_the_tracking_view_as_json() -> TestResult {
        let order = Uuid::now_v7();
        let user = Uuid::now_v7();
        let totals = OrderTotals::new(2500, 500, 0)?;
        let mut orders = MockOrdersService::new();

        orders
            .expect_track()
            .withf(move |order_uuid, user_uuid, _| {
                *order_uuid == OrderUuid::from(order) && Uuid::from(*user_uuid) == user
            })
            .times(1)
            .returning(move |order_uuid, _, _| {
                Ok(OrderTracking {
                    uuid: order_uuid,
                    order_number: "ABCDEF12".to_string(),
                    status: OrderStatus::Preparing,
                    status_text: OrderStatus::Preparing.text(),
                    estimated_delivery: None,
                    timeline: timeline(OrderStatus::Preparing, &[]),
                    driver_location: None,
                    can_cancel: false,
                    totals,
                    items: Vec::new(),
                    payment_method: PaymentMethod::Cash,
                    notes: None,
                    delivery_person_uuid: None,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut out = Vec::new();

        run(TrackArgs { order, user }, &orders, &mut out).await?;

        let json: serde_json::Value = serde_json::from_slice(&out)?;

        assert_eq!(json["order_number"], "ABCDEF12");
        assert_eq!(json["status"], "preparing");
        assert_eq!(json["total"], 3000);
        assert_eq!(json["can_cancel"], false);
        assert_eq!(json["timeline"].as_array().map(Vec::len), Some(7));

        Ok(())
    }

    #[tokio::test]
    async fn reports_missing_orders() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_track()
            .times(1)
            .returning(|_, _, _| Err(OrdersServiceError::OrderNotFound));

        let mut out = Vec::new();

        let result = run(
            TrackArgs {
                order: Uuid::now_v7(),
                user: Uuid::now_v7(),
            },
            &orders,
            &mut out,
        )
        .await;

        assert!(
            matches!(result, Err(ref message) if message.contains("order not found")),
            "expected a not-found message, got {result:?}"
        );
    }
}
