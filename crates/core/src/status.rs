//! Order Status
//!
//! The order state machine. [`OrderStatus::transition`] is the only place a status
//! change is validated: it consults the transition table and then the cancellation
//! policy, so callers cannot reach a disallowed state through any other path.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorKind;

/// Errors raised by the state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// `to` is not reachable from `from`.
    #[error("cannot change order status from {from} to {to}")]
    Illegal {
        /// Current status.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },

    /// Cancellation requested once preparation has started.
    #[error("order cannot be cancelled once preparation has started (status is {status})")]
    CannotCancelAfterPreparation {
        /// Current status.
        status: OrderStatus,
    },
}

impl TransitionError {
    /// Error category.
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::PolicyViolation
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting restaurant confirmation.
    Pending,

    /// Accepted by the restaurant.
    Confirmed,

    /// Being prepared.
    Preparing,

    /// Waiting for the courier.
    Ready,

    /// Collected by the courier.
    PickedUp,

    /// En route to the customer.
    OnTheWay,

    /// Handed over. Terminal.
    Delivered,

    /// Cancelled. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Every status.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::PickedUp,
        Self::OnTheWay,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses from which a customer may still cancel.
    pub const CANCELLABLE: [Self; 2] = [Self::Pending, Self::Confirmed];

    /// Transition table: the statuses directly reachable from `self`.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::Ready, Self::Cancelled],
            Self::Ready => &[Self::PickedUp],
            Self::PickedUp => &[Self::OnTheWay],
            Self::OnTheWay => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// Whether the order can still be cancelled from this status.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Validate a move from `self` to `next`.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::Illegal`] if `next` is not in the transition table for `self`.
    /// - [`TransitionError::CannotCancelAfterPreparation`] if `next` is
    ///   [`OrderStatus::Cancelled`] and `self` is past the cancellation window.
    pub fn transition(self, next: Self) -> Result<Self, TransitionError> {
        if !self.allowed_transitions().contains(&next) {
            return Err(TransitionError::Illegal {
                from: self,
                to: next,
            });
        }

        if next == Self::Cancelled {
            self.ensure_cancellable()?;
        }

        Ok(next)
    }

    /// Check the cancellation policy on its own.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::CannotCancelAfterPreparation`] unless `self` is
    /// one of [`OrderStatus::CANCELLABLE`].
    pub const fn ensure_cancellable(self) -> Result<(), TransitionError> {
        if self.is_cancellable() {
            Ok(())
        } else {
            Err(TransitionError::CannotCancelAfterPreparation { status: self })
        }
    }

    /// Stable identifier, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::PickedUp => "picked_up",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Customer-facing description.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Pending => "Awaiting confirmation",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Being prepared",
            Self::Ready => "Ready for pickup",
            Self::PickedUp => "Picked up from the restaurant",
            Self::OnTheWay => "On the way to you",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised status identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
