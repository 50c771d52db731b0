//! Tracking view assembly.

use jiff::Timestamp;
use platter::tracking::{DriverPosition, StatusStamp, TrackingInput, project};

use crate::domain::orders::models::{LogEvent, Order, OrderTracking, StatusLogEntry};

/// Combine an order, its log (oldest first) and the courier position.
pub(super) fn build_tracking(
    order: Order,
    log: &[StatusLogEntry],
    driver: Option<DriverPosition>,
    now: Timestamp,
) -> OrderTracking {
    let stamps: Vec<StatusStamp> = log
        .iter()
        .filter(|entry| entry.event == LogEvent::StatusChange)
        .map(|entry| StatusStamp {
            status: entry.to_status,
            at: entry.changed_at,
        })
        .collect();

    let projection = project(TrackingInput {
        status: order.status,
        stamps: &stamps,
        driver,
        now,
    });

    OrderTracking {
        order_number: order.order_number(),
        uuid: order.uuid,
        status: projection.status,
        status_text: projection.status_text,
        estimated_delivery: projection.estimated_delivery,
        timeline: projection.timeline,
        driver_location: projection.driver_location,
        can_cancel: projection.can_cancel,
        totals: order.totals,
        items: order.items,
        payment_method: order.payment_method,
        notes: order.notes,
        delivery_person_uuid: order.delivery_person_uuid,
        created_at: order.created_at,
    }
}
