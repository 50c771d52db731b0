//! Order Data

use platter::{pricing::OrderTotals, status::OrderStatus};

use crate::domain::{
    addresses::AddressUuid,
    catalog::models::{FoodUuid, RestaurantUuid},
    orders::models::{LogEvent, OrderItemUuid, OrderUuid, PaymentMethod},
    users::UserUuid,
    vouchers::models::AppliedVoucher,
};

/// Largest page [`OrdersQuery`] will return.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Delivery and payment details shared by both ways of placing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub address: AddressUuid,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub voucher_code: Option<String>,
}

impl CheckoutDetails {
    pub fn new(address: AddressUuid) -> Self {
        Self {
            address,
            payment_method: PaymentMethod::default(),
            notes: None,
            voucher_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectOrderItem {
    pub food: FoodUuid,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// An order placed without going through the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirectOrder {
    pub restaurant: RestaurantUuid,
    pub items: Vec<DirectOrderItem>,
    pub checkout: CheckoutDetails,
}

/// Who is asking to see an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Sees only their own orders.
    Customer(UserUuid),

    /// Restaurant or platform staff; sees every order.
    Staff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersQuery {
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub limit: u32,
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewOrder {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub restaurant: RestaurantUuid,
    pub address: AddressUuid,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub food_uuid: FoodUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewStatusLogEntry {
    pub order: OrderUuid,
    pub event: LogEvent,
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    pub changed_by: UserUuid,
    pub notes: Option<String>,
}

/// Everything the commit step writes for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingOrder {
    pub order: NewOrder,
    pub items: Vec<NewOrderItem>,
    pub voucher: Option<AppliedVoucher>,
}
