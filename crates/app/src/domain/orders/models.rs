//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use platter::{
    pricing::OrderTotals,
    status::OrderStatus,
    tracking::{DriverLocation, TimelineStep},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::{
        addresses::AddressUuid,
        catalog::models::{FoodUuid, RestaurantUuid},
        users::UserUuid,
        vouchers::models::VoucherUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Status Log UUID
pub type StatusLogUuid = TypedUuid<StatusLogEntry>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method `{0}`")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// What a status log row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEvent {
    StatusChange,

    /// A courier was assigned; the status is unchanged.
    Assignment,
}

impl LogEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusChange => "status_change",
            Self::Assignment => "assignment",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log event `{0}`")]
pub struct UnknownLogEvent(pub String);

impl FromStr for LogEvent {
    type Err = UnknownLogEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status_change" => Ok(Self::StatusChange),
            "assignment" => Ok(Self::Assignment),
            other => Err(UnknownLogEvent(other.to_string())),
        }
    }
}

/// Order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub restaurant_uuid: RestaurantUuid,
    pub delivery_address_uuid: AddressUuid,
    pub status: OrderStatus,

    #[serde(flatten)]
    pub totals: OrderTotals,

    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub delivery_person_uuid: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub delivered_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub items: Vec<OrderItem>,
    pub voucher: Option<OrderVoucher>,
}

impl Order {
    /// Short reference shown to customers: the last eight hex digits of the
    /// order id, upper-cased.
    pub fn order_number(&self) -> String {
        let simple = self.uuid.into_uuid().simple().to_string();

        simple
            .get(simple.len().saturating_sub(8)..)
            .unwrap_or_default()
            .to_uppercase()
    }
}

/// Immutable snapshot of a food at the time it was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub food_uuid: FoodUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// Append-only record of something that happened to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLogEntry {
    pub uuid: StatusLogUuid,
    pub order_uuid: OrderUuid,
    pub event: LogEvent,

    /// `None` for the row written when the order is placed.
    pub from_status: Option<OrderStatus>,

    pub to_status: OrderStatus,
    pub changed_by: UserUuid,
    pub notes: Option<String>,
    pub changed_at: Timestamp,
}

impl StatusLogEntry {
    pub fn from_label(&self) -> &'static str {
        self.from_status.map_or("new", OrderStatus::as_str)
    }
}

/// The voucher an order was placed with and the exact discount it gave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderVoucher {
    pub voucher_uuid: VoucherUuid,
    pub code: String,
    pub discount_applied: u64,
}

/// An order with its audit trail, newest entry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,

    pub status_log: Vec<StatusLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit.max(1))),
        }
    }
}

/// What the customer sees while waiting for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTracking {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub status_text: &'static str,
    pub estimated_delivery: Option<Timestamp>,
    pub timeline: Vec<TimelineStep>,
    pub driver_location: Option<DriverLocation>,
    pub can_cancel: bool,

    #[serde(flatten)]
    pub totals: OrderTotals,

    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub delivery_person_uuid: Option<UserUuid>,
    pub created_at: Timestamp,
}
