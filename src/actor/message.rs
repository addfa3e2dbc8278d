//! # Messages
//!
//! The request enum sent from [`CafeClient`](crate::clients::CafeClient) to
//! [`CafeActor`](crate::actor::CafeActor). Every variant carries a one-shot
//! `respond_to` channel for its typed result.

use crate::error::CafeError;
use crate::model::{
    Cart, MenuItem, MenuItemCreate, MenuItemId, Notification, NotificationKind, Order, OrderId,
    OrderStatus, Table, TableId, TableStatus,
};
use crate::report::{ReportPeriod, SalesReport};
use serde::Serialize;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, CafeError>>;

/// Read-only copy of every collection, taken in a single actor turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CafeSnapshot {
    pub tables: Vec<Table>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    pub notifications: Vec<Notification>,
}

impl CafeSnapshot {
    /// Tables are addressed by number on the wire, by id everywhere else.
    pub fn table_by_number(&self, number: u32) -> Option<&Table> {
        self.tables.iter().find(|table| table.number == number)
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Orders that still need staff attention, oldest first.
    pub fn active_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status.is_active())
            .collect()
    }
}

#[derive(Debug)]
pub enum CafeRequest {
    AddTable {
        respond_to: Response<Table>,
    },
    DeleteTable {
        id: TableId,
        respond_to: Response<()>,
    },
    UpdateTableStatus {
        id: TableId,
        status: TableStatus,
        respond_to: Response<Table>,
    },
    AddMenuItem {
        params: MenuItemCreate,
        respond_to: Response<MenuItem>,
    },
    DeleteMenuItem {
        id: MenuItemId,
        respond_to: Response<()>,
    },
    PlaceOrder {
        table_id: TableId,
        cart: Cart,
        respond_to: Response<Order>,
    },
    UpdateOrderStatus {
        id: OrderId,
        status: OrderStatus,
        respond_to: Response<Order>,
    },
    AddNotification {
        message: String,
        kind: NotificationKind,
        respond_to: Response<Notification>,
    },
    MarkAllRead {
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: Response<CafeSnapshot>,
    },
    Report {
        period: ReportPeriod,
        respond_to: Response<SalesReport>,
    },
    /// Reload shared collections from the store and surface new orders.
    Sync {
        respond_to: Response<Vec<Order>>,
    },
}
