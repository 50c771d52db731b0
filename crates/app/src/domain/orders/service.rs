//! Orders service.

use std::slice;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use platter::{
    pricing::{OrderTotals, subtotal},
    status::OrderStatus,
};
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        addresses::{AddressUuid, PgAddressesRepository},
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        catalog::{
            PgCatalogRepository,
            models::{Food, FoodUuid, Restaurant},
        },
        delivery::PgDeliveryProfilesRepository,
        orders::{
            checkout,
            data::{
                CheckoutDetails, MAX_PAGE_LIMIT, NewDirectOrder, NewOrder, NewOrderItem,
                NewStatusLogEntry, OrdersQuery, PendingOrder, StatusUpdate, Viewer,
            },
            errors::OrdersServiceError,
            models::{LogEvent, Order, OrderDetails, OrderTracking, OrderUuid, Page, PageMeta},
            repositories::{
                PgOrderItemsRepository, PgOrderVouchersRepository, PgOrdersRepository,
                PgStatusLogsRepository,
            },
            tracking::build_tracking,
        },
        users::UserUuid,
        vouchers::{PgVouchersRepository, models::AppliedVoucher, service::evaluate_code},
    },
};

const ORDER_PLACED_NOTE: &str = "order placed";
const CUSTOMER_CANCELLED_NOTE: &str = "cancelled by customer";
const ASSIGNED_NOTE: &str = "delivery person assigned";

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    status_logs: PgStatusLogsRepository,
    order_vouchers: PgOrderVouchersRepository,
    carts: PgCartsRepository,
    cart_items: PgCartItemsRepository,
    catalog: PgCatalogRepository,
    addresses: PgAddressesRepository,
    delivery_profiles: PgDeliveryProfilesRepository,
    vouchers: PgVouchersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            status_logs: PgStatusLogsRepository::new(),
            order_vouchers: PgOrderVouchersRepository::new(),
            carts: PgCartsRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            catalog: PgCatalogRepository::new(),
            addresses: PgAddressesRepository::new(),
            delivery_profiles: PgDeliveryProfilesRepository::new(),
            vouchers: PgVouchersRepository::new(),
        }
    }

    async fn ensure_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
        user: UserUuid,
    ) -> Result<(), OrdersServiceError> {
        if self
            .addresses
            .find_owned_address(tx, address, user)
            .await?
            .is_none()
        {
            warn!(address_uuid = %address, "rejected unknown delivery address");

            return Err(OrdersServiceError::AddressNotFound);
        }

        Ok(())
    }

    /// Minimum-order check on the pre-discount subtotal, then delivery fee and
    /// voucher.
    async fn price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: &Restaurant,
        items: &[NewOrderItem],
        voucher_code: Option<&str>,
    ) -> Result<(OrderTotals, Option<AppliedVoucher>), OrdersServiceError> {
        let subtotal = subtotal(items.iter().map(|item| (item.unit_price, item.quantity)))?;

        if subtotal < restaurant.minimum_order {
            warn!(
                minimum = restaurant.minimum_order,
                subtotal, "rejected order below minimum"
            );

            return Err(OrdersServiceError::BelowMinimumOrder {
                minimum: restaurant.minimum_order,
                subtotal,
            });
        }

        let voucher = match voucher_code.map(str::trim).filter(|code| !code.is_empty()) {
            Some(code) => {
                let (voucher, discount) =
                    evaluate_code(&self.vouchers, tx, code, subtotal, Timestamp::now()).await?;

                Some(AppliedVoucher::new(&voucher, discount))
            }
            None => None,
        };

        let discount = voucher.as_ref().map_or(0, |voucher| voucher.discount);
        let totals = OrderTotals::new(subtotal, restaurant.delivery_fee, discount)?;

        Ok((totals, voucher))
    }

    /// Write the order, its items, the opening log row and the voucher link.
    async fn commit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pending: PendingOrder,
    ) -> Result<Order, OrdersServiceError> {
        let mut order = self.orders.create_order(tx, &pending.order).await?;

        order.items = self
            .items
            .create_order_items(tx, order.uuid, &pending.items)
            .await?;

        self.status_logs
            .append_status_log(
                tx,
                NewStatusLogEntry {
                    order: order.uuid,
                    event: LogEvent::StatusChange,
                    from_status: None,
                    to_status: OrderStatus::Pending,
                    changed_by: pending.order.user,
                    notes: Some(ORDER_PLACED_NOTE.to_string()),
                },
            )
            .await?;

        if let Some(voucher) = &pending.voucher {
            order.voucher = Some(
                self.order_vouchers
                    .link_voucher(tx, order.uuid, voucher)
                    .await?,
            );
        }

        Ok(order)
    }

    /// The single path every status change takes. The transition table and
    /// the cancellation policy are both checked by [`OrderStatus::transition`].
    async fn transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
        next: OrderStatus,
        actor: UserUuid,
        notes: Option<String>,
    ) -> Result<Order, OrdersServiceError> {
        let next = order.status.transition(next).inspect_err(|error| {
            warn!(order_uuid = %order.uuid, %error, "rejected status transition");
        })?;

        let log = self
            .status_logs
            .append_status_log(
                tx,
                NewStatusLogEntry {
                    order: order.uuid,
                    event: LogEvent::StatusChange,
                    from_status: Some(order.status),
                    to_status: next,
                    changed_by: actor,
                    notes,
                },
            )
            .await?;

        let mut updated = self
            .orders
            .update_order_status(tx, order.uuid, next, log.changed_at)
            .await?;

        self.attach_details(tx, slice::from_mut(&mut updated)).await?;

        Ok(updated)
    }

    /// Fill in items and voucher links for `orders` with two queries.
    async fn attach_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [Order],
    ) -> Result<(), OrdersServiceError> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items = FxHashMap::<OrderUuid, Vec<_>>::default();

        for item in self.items.get_order_items(tx, &uuids).await? {
            items.entry(item.order_uuid).or_default().push(item);
        }

        let mut vouchers: FxHashMap<_, _> = self
            .order_vouchers
            .get_order_vouchers(tx, &uuids)
            .await?
            .into_iter()
            .collect();

        for order in orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
            order.voucher = vouchers.remove(&order.uuid);
        }

        Ok(())
    }

    async fn find_owned_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        viewer: Viewer,
    ) -> Result<Order, OrdersServiceError> {
        match self.orders.find_order(tx, order).await? {
            Some(order) if viewer.can_see(&order) => Ok(order),
            _ => Err(OrdersServiceError::OrderNotFound),
        }
    }
}

impl Viewer {
    fn can_see(self, order: &Order) -> bool {
        match self {
            Self::Customer(user) => order.user_uuid == user,
            Self::Staff => true,
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_from_cart",
        skip(self, checkout),
        fields(
            user_uuid = %user,
            cart_uuid = tracing::field::Empty,
            order_uuid = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_from_cart(
        &self,
        user: UserUuid,
        checkout: CheckoutDetails,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts
            .lock_cart_for_user(&mut tx, user)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        let span = Span::current();

        span.record("cart_uuid", tracing::field::display(cart.uuid));

        let lines = self.cart_items.get_cart_lines(&mut tx, cart.uuid).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let unavailable = checkout::unavailable_cart_lines(&lines);

        if !unavailable.is_empty() {
            warn!(count = unavailable.len(), "rejected cart with unavailable items");

            return Err(OrdersServiceError::ItemsUnavailable(unavailable));
        }

        self.ensure_address(&mut tx, checkout.address, user).await?;

        let restaurant = self
            .catalog
            .get_restaurant(&mut tx, cart.restaurant_uuid)
            .await?;

        let items = checkout::items_from_cart(lines);

        let (totals, voucher) = self
            .price(&mut tx, &restaurant, &items, checkout.voucher_code.as_deref())
            .await?;

        let order = self
            .commit(
                &mut tx,
                PendingOrder {
                    order: NewOrder {
                        uuid: OrderUuid::new(),
                        user,
                        restaurant: restaurant.uuid,
                        address: checkout.address,
                        totals,
                        payment_method: checkout.payment_method,
                        notes: checkout.notes,
                    },
                    items,
                    voucher,
                },
            )
            .await?;

        self.cart_items.delete_cart_items(&mut tx, cart.uuid).await?;

        // A concurrent checkout of the same cart must not produce a second order.
        if self.carts.delete_cart(&mut tx, cart.uuid).await? != 1 {
            return Err(OrdersServiceError::EmptyCart);
        }

        tx.commit().await?;

        span.record("order_uuid", tracing::field::display(order.uuid));
        span.record("total", order.totals.total);

        info!(order_uuid = %order.uuid, total = order.totals.total, "placed order from cart");

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.create_direct",
        skip(self, order),
        fields(
            user_uuid = %user,
            restaurant_uuid = %order.restaurant,
            item_count = order.items.len(),
            order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn create_direct(
        &self,
        user: UserUuid,
        order: NewDirectOrder,
    ) -> Result<Order, OrdersServiceError> {
        checkout::validate_direct_items(&order.items)?;

        let mut tx = self.db.begin().await?;

        let restaurant = match self.catalog.get_restaurant(&mut tx, order.restaurant).await {
            Ok(restaurant) if restaurant.is_active => restaurant,
            Ok(_) | Err(sqlx::Error::RowNotFound) => {
                return Err(OrdersServiceError::RestaurantNotFound);
            }
            Err(error) => return Err(error.into()),
        };

        self.ensure_address(&mut tx, order.checkout.address, user)
            .await?;

        let requested: Vec<FoodUuid> = order.items.iter().map(|item| item.food).collect();

        let foods: FxHashMap<FoodUuid, Food> = self
            .catalog
            .get_foods(&mut tx, &requested)
            .await?
            .into_iter()
            .map(|food| (food.uuid, food))
            .collect();

        let unavailable = checkout::unorderable_items(&order.items, &foods, restaurant.uuid);

        if !unavailable.is_empty() {
            warn!(count = unavailable.len(), "rejected unorderable items");

            return Err(OrdersServiceError::ItemsUnavailable(unavailable));
        }

        let items = checkout::items_from_catalog(order.items, &foods)?;

        let (totals, voucher) = self
            .price(
                &mut tx,
                &restaurant,
                &items,
                order.checkout.voucher_code.as_deref(),
            )
            .await?;

        let created = self
            .commit(
                &mut tx,
                PendingOrder {
                    order: NewOrder {
                        uuid: OrderUuid::new(),
                        user,
                        restaurant: restaurant.uuid,
                        address: order.checkout.address,
                        totals,
                        payment_method: order.checkout.payment_method,
                        notes: order.checkout.notes,
                    },
                    items,
                    voucher,
                },
            )
            .await?;

        tx.commit().await?;

        Span::current().record("order_uuid", tracing::field::display(created.uuid));

        info!(order_uuid = %created.uuid, total = created.totals.total, "placed direct order");

        Ok(created)
    }

    async fn find_by_id(
        &self,
        order: OrderUuid,
        viewer: Viewer,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.find_owned_order(&mut tx, order, viewer).await?;

        self.attach_details(&mut tx, slice::from_mut(&mut order))
            .await?;

        let mut status_log = self.status_logs.get_status_logs(&mut tx, order.uuid).await?;

        tx.commit().await?;

        status_log.reverse();

        Ok(OrderDetails { order, status_log })
    }

    async fn find_user_orders(
        &self,
        user: UserUuid,
        query: OrdersQuery,
    ) -> Result<Page<Order>, OrdersServiceError> {
        if query.page == 0 || query.limit == 0 {
            return Err(OrdersServiceError::InvalidPage);
        }

        let limit = query.limit.min(MAX_PAGE_LIMIT);
        let offset = u64::from(query.page - 1) * u64::from(limit);

        let mut tx = self.db.begin().await?;

        let total = self
            .orders
            .count_user_orders(&mut tx, user, query.status)
            .await?;

        let mut orders = self
            .orders
            .list_user_orders(&mut tx, user, query.status, limit, offset)
            .await?;

        self.attach_details(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(Page {
            data: orders,
            meta: PageMeta::new(total, query.page, limit),
        })
    }

    async fn track(
        &self,
        order: OrderUuid,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<OrderTracking, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self
            .find_owned_order(&mut tx, order, Viewer::Customer(user))
            .await?;

        self.attach_details(&mut tx, slice::from_mut(&mut order))
            .await?;

        let log = self.status_logs.get_status_logs(&mut tx, order.uuid).await?;

        let driver = match order.delivery_person_uuid {
            Some(person) => self
                .delivery_profiles
                .find_profile(&mut tx, person)
                .await?
                .map(Into::into),
            None => None,
        };

        tx.commit().await?;

        Ok(build_tracking(order, &log, driver, point_in_time))
    }

    #[tracing::instrument(
        name = "orders.service.cancel",
        skip(self, reason),
        fields(order_uuid = %order, user_uuid = %user),
        err
    )]
    async fn cancel(
        &self,
        order: OrderUuid,
        user: UserUuid,
        reason: Option<String>,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = match self.orders.lock_order(&mut tx, order).await? {
            Some(current) if current.user_uuid == user => current,
            _ => return Err(OrdersServiceError::OrderNotFound),
        };

        current.status.ensure_cancellable().inspect_err(|error| {
            warn!(%error, "rejected cancellation");
        })?;

        let notes = reason
            .filter(|reason| !reason.trim().is_empty())
            .unwrap_or_else(|| CUSTOMER_CANCELLED_NOTE.to_string());

        let cancelled = self
            .transition(&mut tx, &current, OrderStatus::Cancelled, user, Some(notes))
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order, "cancelled order");

        Ok(cancelled)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, update),
        fields(order_uuid = %order, actor_uuid = %actor, status = %update.status),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
        actor: UserUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::OrderNotFound)?;

        let updated = self
            .transition(&mut tx, &current, update.status, actor, update.notes)
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %order,
            from = %current.status,
            to = %updated.status,
            "updated order status"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.assign_delivery_person",
        skip(self),
        fields(order_uuid = %order, delivery_person_uuid = %delivery_person, actor_uuid = %actor),
        err
    )]
    async fn assign_delivery_person(
        &self,
        order: OrderUuid,
        delivery_person: UserUuid,
        actor: UserUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::OrderNotFound)?;

        let available = self
            .delivery_profiles
            .find_profile(&mut tx, delivery_person)
            .await?
            .is_some_and(|profile| profile.is_available);

        if !available {
            warn!("rejected unavailable delivery person");

            return Err(OrdersServiceError::DeliveryPersonUnavailable);
        }

        let mut updated = self
            .orders
            .assign_delivery_person(&mut tx, order, delivery_person)
            .await?;

        self.status_logs
            .append_status_log(
                &mut tx,
                NewStatusLogEntry {
                    order,
                    event: LogEvent::Assignment,
                    from_status: Some(current.status),
                    to_status: current.status,
                    changed_by: actor,
                    notes: Some(ASSIGNED_NOTE.to_string()),
                },
            )
            .await?;

        self.attach_details(&mut tx, slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order, "assigned delivery person");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the caller's cart into a `pending` order and delete the cart, all
    /// in one transaction.
    async fn create_from_cart(
        &self,
        user: UserUuid,
        checkout: CheckoutDetails,
    ) -> Result<Order, OrdersServiceError>;

    /// Place an order from an explicit item list at current catalog prices.
    async fn create_direct(
        &self,
        user: UserUuid,
        order: NewDirectOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// An order with items, voucher link and status log (newest first).
    async fn find_by_id(
        &self,
        order: OrderUuid,
        viewer: Viewer,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// A page of the user's orders, newest first.
    async fn find_user_orders(
        &self,
        user: UserUuid,
        query: OrdersQuery,
    ) -> Result<Page<Order>, OrdersServiceError>;

    /// The customer's tracking view of their order.
    async fn track(
        &self,
        order: OrderUuid,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<OrderTracking, OrdersServiceError>;

    /// Customer cancellation. Only `pending` and `confirmed` orders qualify.
    async fn cancel(
        &self,
        order: OrderUuid,
        user: UserUuid,
        reason: Option<String>,
    ) -> Result<Order, OrdersServiceError>;

    /// Move an order to `update.status` if the transition table allows it.
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
        actor: UserUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Assign an available courier. The status is unchanged but the action
    /// is logged.
    async fn assign_delivery_person(
        &self,
        order: OrderUuid,
        delivery_person: UserUuid,
        actor: UserUuid,
    ) -> Result<Order, OrdersServiceError>;
}
