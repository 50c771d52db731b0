//! Integration tests walking an order from cart pricing to tracking.

use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

use platter::prelude::*;

fn weekend_voucher() -> VoucherTerms {
    VoucherTerms {
        discount_type: DiscountType::Percentage,
        value: 20,
        max_discount: Some(500),
        min_order_value: 1000,
        is_active: true,
        expires_at: Timestamp::MAX,
    }
}

#[test]
fn cart_to_order_totals_use_pre_discount_minimum() -> TestResult {
    let lines = [
        CartLine {
            unit_price: 1200,
            quantity: 2,
            is_available: true,
        },
        CartLine {
            unit_price: 600,
            quantity: 1,
            is_available: true,
        },
    ];

    let cart = summarize(&lines, 200, 2500)?;

    assert_eq!(cart.subtotal, 3000);
    assert!(cart.meets_minimum);

    let discount = evaluate(&weekend_voucher(), cart.subtotal, Timestamp::now())?;
    let totals = OrderTotals::new(cart.subtotal, cart.delivery_fee, discount.amount)?;

    // 20% of 3000 is 600, capped at 500; the delivery fee is never discounted.
    assert_eq!(totals.voucher_discount, 500);
    assert_eq!(totals.total, 2700);

    Ok(())
}

#[test]
fn fixed_voucher_can_zero_the_subtotal_but_not_the_fee() -> TestResult {
    let voucher = VoucherTerms {
        discount_type: DiscountType::Fixed,
        value: 1000,
        max_discount: None,
        min_order_value: 0,
        ..weekend_voucher()
    };

    let discount = evaluate(&voucher, 800, Timestamp::now())?;
    let totals = OrderTotals::new(800, 250, discount.amount)?;

    assert_eq!(discount.amount, 800);
    assert_eq!(discount.discounted_subtotal, 0);
    assert_eq!(totals.total, 250);

    Ok(())
}

#[test]
fn cancellation_closes_once_preparation_starts() -> TestResult {
    let status = OrderStatus::Pending
        .transition(OrderStatus::Confirmed)?
        .transition(OrderStatus::Preparing)?;

    let result = status.transition(OrderStatus::Cancelled);

    assert_eq!(
        result,
        Err(TransitionError::CannotCancelAfterPreparation {
            status: OrderStatus::Preparing
        })
    );
    assert_eq!(
        result.err().map(|error| error.kind()),
        Some(ErrorKind::PolicyViolation)
    );

    Ok(())
}

#[test]
fn tracking_a_ready_order() -> TestResult {
    let placed = Timestamp::now().checked_sub(SignedDuration::from_mins(25))?;
    let mut stamps = Vec::new();
    let mut status = OrderStatus::Pending;

    stamps.push(StatusStamp {
        status,
        at: placed,
    });

    for (minutes, next) in [
        (5, OrderStatus::Confirmed),
        (10, OrderStatus::Preparing),
        (20, OrderStatus::Ready),
    ] {
        status = status.transition(next)?;
        stamps.push(StatusStamp {
            status,
            at: placed.checked_add(SignedDuration::from_mins(minutes))?,
        });
    }

    let now = Timestamp::now();
    let projection = project(TrackingInput {
        status,
        stamps: &stamps,
        driver: None,
        now,
    });

    let completed: Vec<OrderStatus> = projection
        .timeline
        .iter()
        .filter(|step| step.completed)
        .map(|step| step.status)
        .collect();

    assert_eq!(
        completed,
        [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready
        ]
    );
    assert_eq!(
        projection.estimated_delivery,
        Some(now.checked_add(SignedDuration::from_mins(20))?)
    );
    assert!(!projection.can_cancel);
    assert!(projection.driver_location.is_none());

    Ok(())
}
