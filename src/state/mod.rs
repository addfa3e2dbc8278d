//! # Ordering State
//!
//! [`CafeState`] owns the four collections (tables, menu items, orders,
//! notifications) and every rule that ties them together. It does no I/O and
//! knows nothing about actors or storage, so each operation can be tested as a
//! plain function call.
//!
//! ## Failure atomicity
//!
//! Every mutating method validates first and only then writes. An `Err` return
//! therefore means no collection was touched.
//!
//! ## Change tracking
//!
//! Mutations return or record which collections they changed
//! ([`Changed`]), so the owner can persist exactly those snapshots.

mod detector;

pub use detector::NewOrderDetector;

use crate::error::CafeError;
use crate::model::{
    Cart, IdSequence, MenuItem, MenuItemCreate, MenuItemId, Notification, NotificationKind,
    Order, OrderId, OrderStatus, Table, TableId, TableStatus,
};
use crate::report::{build_report, ReportPeriod, SalesReport};
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

/// Default cap on the notification log.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

/// Which collections a mutation touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changed {
    pub tables: bool,
    pub menu_items: bool,
    pub orders: bool,
    pub notifications: bool,
}

impl Changed {
    pub const TABLES: Changed = Changed {
        tables: true,
        menu_items: false,
        orders: false,
        notifications: false,
    };
    pub const MENU_ITEMS: Changed = Changed {
        tables: false,
        menu_items: true,
        orders: false,
        notifications: false,
    };
    pub const NOTIFICATIONS: Changed = Changed {
        tables: false,
        menu_items: false,
        orders: false,
        notifications: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.tables || self.menu_items || self.orders || self.notifications)
    }
}

/// The in-memory snapshot of every collection.
#[derive(Debug, Clone)]
pub struct CafeState {
    tables: Vec<Table>,
    menu_items: Vec<MenuItem>,
    orders: Vec<Order>,
    /// Newest first.
    notifications: Vec<Notification>,
    notification_limit: usize,
    table_ids: IdSequence,
    menu_item_ids: IdSequence,
    order_ids: IdSequence,
    notification_ids: IdSequence,
}

impl Default for CafeState {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_LIMIT)
    }
}

impl CafeState {
    pub fn new(notification_limit: usize) -> Self {
        Self {
            tables: Vec::new(),
            menu_items: Vec::new(),
            orders: Vec::new(),
            notifications: Vec::new(),
            notification_limit: notification_limit.max(1),
            table_ids: IdSequence::default(),
            menu_item_ids: IdSequence::default(),
            order_ids: IdSequence::default(),
            notification_ids: IdSequence::default(),
        }
    }

    /// Rebuild state from persisted collections.
    pub fn from_snapshots(
        tables: Vec<Table>,
        menu_items: Vec<MenuItem>,
        orders: Vec<Order>,
        notifications: Vec<Notification>,
        notification_limit: usize,
    ) -> Self {
        let mut state = Self::new(notification_limit);
        state.replace_tables(tables);
        state.replace_orders(orders);
        state.replace_menu_items(menu_items);
        for notification in &notifications {
            state.notification_ids.observe(notification.id.0);
        }
        state.notifications = notifications;
        state.notifications.truncate(state.notification_limit);
        state
    }

    // --- Snapshots ---

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|table| table.id == id)
    }

    pub fn menu_item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.menu_items.iter().find(|item| item.id == id)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Occupancy derived from the orders: at least one non-completed order.
    pub fn is_occupied(&self, id: TableId) -> bool {
        self.orders
            .iter()
            .any(|order| order.table_id == id && order.status.is_active())
    }

    /// Replace the tables collection with a fresh snapshot from the store.
    pub fn replace_tables(&mut self, tables: Vec<Table>) {
        for table in &tables {
            self.table_ids.observe(table.id.0);
        }
        self.tables = tables;
    }

    /// Replace the menu with a fresh snapshot from the store.
    pub fn replace_menu_items(&mut self, menu_items: Vec<MenuItem>) {
        for item in &menu_items {
            self.menu_item_ids.observe(item.id.0);
        }
        self.menu_items = menu_items;
    }

    /// Replace the orders collection with a fresh snapshot from the store.
    pub fn replace_orders(&mut self, orders: Vec<Order>) {
        for order in &orders {
            self.order_ids.observe(order.id.0);
        }
        self.orders = orders;
    }

    // --- Tables ---

    pub fn add_table(&mut self) -> Result<Table, CafeError> {
        let number = u32::try_from(self.tables.len()).unwrap_or(u32::MAX - 1) + 1;
        let table = Table::new(self.table_ids.next()?, number);
        debug!(id = %table.id, number, "table added");
        self.tables.push(table.clone());
        Ok(table)
    }

    /// Remove a table. Orders that reference it are left as they are.
    pub fn delete_table(&mut self, id: TableId) -> Result<(), CafeError> {
        let pos = self
            .tables
            .iter()
            .position(|table| table.id == id)
            .ok_or_else(|| CafeError::NotFound(id.to_string()))?;
        self.tables.remove(pos);
        Ok(())
    }

    pub fn update_table_status(
        &mut self,
        id: TableId,
        status: TableStatus,
    ) -> Result<Table, CafeError> {
        let table = self.table_mut(id)?;
        table.status = status;
        Ok(table.clone())
    }

    // --- Menu ---

    pub fn add_menu_item(&mut self, params: MenuItemCreate) -> Result<MenuItem, CafeError> {
        let mut ids = self.menu_item_ids.clone();
        let item = params.validate(ids.next()?)?;
        self.menu_item_ids = ids;
        self.menu_items.push(item.clone());
        Ok(item)
    }

    /// Remove a menu item. Orders keep their own copies of its name and price.
    pub fn delete_menu_item(&mut self, id: MenuItemId) -> Result<(), CafeError> {
        let pos = self
            .menu_items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CafeError::NotFound(id.to_string()))?;
        self.menu_items.remove(pos);
        Ok(())
    }

    // --- Orders ---

    /// Check out `cart` for `table_id`.
    ///
    /// Creates a pending order, marks the table occupied and clears the cart.
    ///
    /// # Errors
    /// - `InvalidState` if the cart is empty or no order ids are left.
    /// - `NotFound` if the table does not exist.
    ///
    /// On error neither the state nor the cart is modified.
    pub fn place_order(
        &mut self,
        table_id: TableId,
        cart: &mut Cart,
        now: DateTime<Utc>,
    ) -> Result<Order, CafeError> {
        if cart.is_empty() {
            return Err(CafeError::InvalidState("cannot place an empty order".into()));
        }
        let table_pos = self
            .tables
            .iter()
            .position(|table| table.id == table_id)
            .ok_or_else(|| CafeError::NotFound(table_id.to_string()))?;

        let order = Order::new(
            self.order_ids.next()?,
            table_id,
            self.tables[table_pos].number,
            cart.lines().to_vec(),
            now,
        );
        self.orders.push(order.clone());
        self.tables[table_pos].status = TableStatus::Occupied;
        cart.clear();
        Ok(order)
    }

    /// Move an order to `status`.
    ///
    /// Completing an order frees its table unless another active order still
    /// sits there, and logs a `completed` notification. Moving to `preparing`
    /// logs a `preparing` notification. Setting the current status again
    /// changes nothing.
    ///
    /// # Errors
    /// - `NotFound` if the order does not exist.
    /// - `InvalidState` when leaving `completed`.
    pub fn update_order_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(Order, Changed), CafeError> {
        let pos = self
            .orders
            .iter()
            .position(|order| order.id == id)
            .ok_or_else(|| CafeError::NotFound(id.to_string()))?;

        let Some(next) = self.orders[pos].status.transition(status)? else {
            return Ok((self.orders[pos].clone(), Changed::default()));
        };

        self.orders[pos].status = next;
        let order = self.orders[pos].clone();
        let mut changed = Changed {
            orders: true,
            ..Changed::default()
        };

        match next {
            OrderStatus::Completed => {
                if !self.is_occupied(order.table_id) {
                    if let Ok(table) = self.table_mut(order.table_id) {
                        table.status = TableStatus::Available;
                        changed.tables = true;
                    }
                }
                self.add_notification(
                    format!("Order #{} for Table {} completed", order.id.0, order.table_number),
                    NotificationKind::Completed,
                    now,
                )?;
                changed.notifications = true;
            }
            OrderStatus::Preparing => {
                self.add_notification(
                    format!("Order #{} is being prepared", order.id.0),
                    NotificationKind::Preparing,
                    now,
                )?;
                changed.notifications = true;
            }
            _ => {}
        }

        Ok((order, changed))
    }

    // --- Notifications ---

    /// Prepend an unread entry and drop the oldest beyond the limit.
    pub fn add_notification(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: DateTime<Utc>,
    ) -> Result<Notification, CafeError> {
        let notification = Notification::new(self.notification_ids.next()?, message, kind, now);
        self.notifications.insert(0, notification.clone());
        self.notifications.truncate(self.notification_limit);
        Ok(notification)
    }

    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    // --- Reports ---

    pub fn report<Tz: TimeZone>(&self, period: ReportPeriod, now: &DateTime<Tz>) -> SalesReport {
        build_report(&self.orders, period, now)
    }

    fn table_mut(&mut self, id: TableId) -> Result<&mut Table, CafeError> {
        self.tables
            .iter_mut()
            .find(|table| table.id == id)
            .ok_or_else(|| CafeError::NotFound(id.to_string()))
    }
}
