//! Order Repositories

mod items;
mod order_vouchers;
mod orders;
mod status_logs;

pub(crate) use items::PgOrderItemsRepository;
pub(crate) use order_vouchers::PgOrderVouchersRepository;
pub(crate) use orders::PgOrdersRepository;
pub(crate) use status_logs::PgStatusLogsRepository;
