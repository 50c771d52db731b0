//! Tracking
//!
//! Read-side projection of an order for the customer: estimated delivery, the
//! seven-step timeline and the courier's live position.

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::status::OrderStatus;

/// Canonical timeline ordering. Cancellation is not a step.
pub const TIMELINE: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::PickedUp,
    OrderStatus::OnTheWay,
    OrderStatus::Delivered,
];

/// A recorded arrival at `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStamp {
    /// Status entered.
    pub status: OrderStatus,

    /// When it was entered.
    pub at: Timestamp,
}

/// Courier profile state as reported by the delivery-profile provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverPosition {
    /// Last reported latitude.
    pub latitude: Option<f64>,

    /// Last reported longitude.
    pub longitude: Option<f64>,

    /// Whether the courier is currently available.
    pub is_available: bool,
}

/// Courier position as shown to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriverLocation {
    /// Latitude
    pub latitude: Option<f64>,

    /// Longitude
    pub longitude: Option<f64>,

    /// Mirrors the profile availability flag.
    pub is_active: bool,
}

impl From<DriverPosition> for DriverLocation {
    fn from(position: DriverPosition) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            is_active: position.is_available,
        }
    }
}

/// One step of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    /// Status this step represents.
    pub status: OrderStatus,

    /// Customer-facing label.
    pub label: &'static str,

    /// Reached, and the order is not cancelled.
    pub completed: bool,

    /// The order is currently at this step.
    pub current: bool,

    /// When the step was reached, if recorded.
    pub timestamp: Option<Timestamp>,
}

/// Inputs to [`project`].
#[derive(Debug, Clone, Copy)]
pub struct TrackingInput<'a> {
    /// Current order status.
    pub status: OrderStatus,

    /// Status changes in the order they happened.
    pub stamps: &'a [StatusStamp],

    /// Present only when a courier is assigned and has a delivery profile.
    pub driver: Option<DriverPosition>,

    /// Evaluation instant.
    pub now: Timestamp,
}

/// Derived tracking state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingProjection {
    /// Current order status.
    pub status: OrderStatus,

    /// Customer-facing description of `status`.
    pub status_text: &'static str,

    /// `None` once the order is delivered or cancelled.
    pub estimated_delivery: Option<Timestamp>,

    /// The seven canonical steps.
    pub timeline: Vec<TimelineStep>,

    /// Courier position, if one is assigned.
    pub driver_location: Option<DriverLocation>,

    /// Mirrors [`OrderStatus::is_cancellable`].
    pub can_cancel: bool,
}

/// Project the tracking view of an order.
pub fn project(input: TrackingInput<'_>) -> TrackingProjection {
    TrackingProjection {
        status: input.status,
        status_text: input.status.text(),
        estimated_delivery: estimated_delivery(input.status, input.now),
        timeline: timeline(input.status, input.stamps),
        driver_location: input.driver.map(DriverLocation::from),
        can_cancel: input.status.is_cancellable(),
    }
}

/// Minutes until delivery, by status.
pub const fn estimated_minutes(status: OrderStatus) -> Option<i64> {
    match status {
        OrderStatus::Pending => Some(50),
        OrderStatus::Confirmed => Some(40),
        OrderStatus::Preparing => Some(30),
        OrderStatus::Ready => Some(20),
        OrderStatus::PickedUp | OrderStatus::OnTheWay => Some(15),
        OrderStatus::Delivered | OrderStatus::Cancelled => None,
    }
}

/// `now` plus the estimate for `status`.
pub fn estimated_delivery(status: OrderStatus, now: Timestamp) -> Option<Timestamp> {
    let minutes = estimated_minutes(status)?;

    now.checked_add(SignedDuration::from_mins(minutes)).ok()
}

/// Build the timeline for an order currently at `current`.
///
/// A step takes the timestamp of the first stamp that entered its status.
pub fn timeline(current: OrderStatus, stamps: &[StatusStamp]) -> Vec<TimelineStep> {
    let cancelled = current == OrderStatus::Cancelled;
    let current_index = TIMELINE.iter().position(|status| *status == current);

    TIMELINE
        .iter()
        .enumerate()
        .map(|(index, &status)| TimelineStep {
            status,
            label: label(status),
            completed: !cancelled && current_index.is_some_and(|reached| index <= reached),
            current: status == current,
            timestamp: stamps
                .iter()
                .find(|stamp| stamp.status == status)
                .map(|stamp| stamp.at),
        })
        .collect()
}

const fn label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order received",
        OrderStatus::Confirmed => "Order confirmed",
        OrderStatus::Preparing => "Preparing",
        OrderStatus::Ready => "Ready for pickup",
        OrderStatus::PickedUp => "Picked up",
        OrderStatus::OnTheWay => "On the way",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    fn stamps(base: Timestamp, statuses: &[OrderStatus]) -> Result<Vec<StatusStamp>, jiff::Error> {
        statuses
            .iter()
            .zip(0_i64..)
            .map(|(&status, minute)| {
                Ok(StatusStamp {
                    status,
                    at: base.checked_add(SignedDuration::from_mins(minute))?,
                })
            })
            .collect()
    }

    #[test]
    fn ready_order_completes_first_four_steps() -> TestResult {
        let base = Timestamp::now();
        let stamps = stamps(
            base,
            &[
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
            ],
        )?;

        let steps = timeline(OrderStatus::Ready, &stamps);
        let completed: Vec<bool> = steps.iter().map(|step| step.completed).collect();

        assert_eq!(
            completed,
            [true, true, true, true, false, false, false],
            "unexpected completion flags"
        );

        let current: Vec<OrderStatus> = steps
            .iter()
            .filter(|step| step.current)
            .map(|step| step.status)
            .collect();

        assert_eq!(current, [OrderStatus::Ready]);

        let stamped = steps.iter().filter(|step| step.timestamp.is_some()).count();

        assert_eq!(stamped, 4);

        Ok(())
    }

    #[test]
    fn cancelled_order_completes_nothing() -> TestResult {
        let stamps = stamps(
            Timestamp::now(),
            &[OrderStatus::Pending, OrderStatus::Cancelled],
        )?;

        let steps = timeline(OrderStatus::Cancelled, &stamps);

        assert!(steps.iter().all(|step| !step.completed && !step.current));

        let pending = steps.first().and_then(|step| step.timestamp);
        let first_stamp = stamps.first().map(|stamp| stamp.at);

        assert_eq!(pending, first_stamp);

        Ok(())
    }

    #[test]
    fn estimates_follow_the_status_table() -> TestResult {
        let now = Timestamp::now();

        assert_eq!(
            estimated_delivery(OrderStatus::Pending, now),
            Some(now.checked_add(SignedDuration::from_mins(50))?)
        );
        assert_eq!(
            estimated_delivery(OrderStatus::OnTheWay, now),
            Some(now.checked_add(SignedDuration::from_mins(15))?)
        );
        assert_eq!(estimated_delivery(OrderStatus::Delivered, now), None);
        assert_eq!(estimated_delivery(OrderStatus::Cancelled, now), None);

        Ok(())
    }

    #[test]
    fn driver_location_requires_a_position() {
        let now = Timestamp::now();

        let without = project(TrackingInput {
            status: OrderStatus::PickedUp,
            stamps: &[],
            driver: None,
            now,
        });

        assert!(without.driver_location.is_none());

        let with = project(TrackingInput {
            status: OrderStatus::PickedUp,
            stamps: &[],
            driver: Some(DriverPosition {
                latitude: Some(36.7538),
                longitude: Some(3.0588),
                is_available: true,
            }),
            now,
        });

        assert_eq!(
            with.driver_location,
            Some(DriverLocation {
                latitude: Some(36.7538),
                longitude: Some(3.0588),
                is_active: true,
            })
        );
    }

    #[test]
    fn can_cancel_mirrors_the_cancellation_policy() {
        for status in OrderStatus::ALL {
            let projection = project(TrackingInput {
                status,
                stamps: &[],
                driver: None,
                now: Timestamp::now(),
            });

            assert_eq!(projection.can_cancel, status.is_cancellable());
        }
    }
}
