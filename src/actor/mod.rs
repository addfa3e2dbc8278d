//! # State Actor
//!
//! [`CafeActor`] is the single writer of the ordering state. It owns a
//! [`CafeState`], the store handle and the new-order detector, and processes
//! [`CafeRequest`]s one at a time from an mpsc channel.
//!
//! ## Concurrency Model
//!
//! Because one task owns the state and handles one message per turn, every
//! request is atomic with respect to every other request sent through a
//! [`CafeClient`]. `PlaceOrder` creates the order and occupies the table in the
//! same turn; no reader can observe one without the other.
//!
//! ## Commit Protocol
//!
//! A mutation runs against a clone of the state. The collections it changed
//! are written to the store as whole snapshots (orders first), and only when
//! every write succeeded does the clone replace the live state. A storage
//! failure therefore surfaces as `StorageUnavailable` and leaves memory as it
//! was. A write that fails midway can leave earlier keys ahead of memory; the
//! next `Sync` reloads them.

pub mod message;

pub use message::{CafeRequest, CafeSnapshot, Response};

use crate::api::OrderEvent;
use crate::clients::CafeClient;
use crate::config::CafeConfig;
use crate::error::CafeError;
use crate::model::{default_menu, MenuItem, Notification, NotificationKind, Order, Table};
use crate::state::{CafeState, Changed, NewOrderDetector};
use crate::storage::{
    load_collection, save_collection, KeyValueStore, StorageError, MENU_ITEMS_KEY,
    NOTIFICATIONS_KEY, ORDERS_KEY, TABLES_KEY,
};
use chrono::{Local, Utc};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Capacity of the order event broadcast channel.
const EVENT_BUFFER: usize = 64;

/// The actor that owns the ordering state.
pub struct CafeActor {
    receiver: mpsc::Receiver<CafeRequest>,
    state: CafeState,
    detector: NewOrderDetector,
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<OrderEvent>,
}

impl CafeActor {
    /// Load every collection from `store` and build the actor and its client.
    ///
    /// Seeds the default menu when the store has no menu collection and
    /// `config.seed_default_menu` is set. Orders already in the store are
    /// treated as known and will not be reported as new.
    ///
    /// # Errors
    /// `StorageUnavailable` when a collection cannot be read or decoded, or
    /// the seeded menu cannot be written.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        config: &CafeConfig,
    ) -> Result<(Self, CafeClient), CafeError> {
        let tables: Option<Vec<Table>> = load_collection(store.as_ref(), TABLES_KEY).await?;
        let menu_items: Option<Vec<MenuItem>> =
            load_collection(store.as_ref(), MENU_ITEMS_KEY).await?;
        let orders: Option<Vec<Order>> = load_collection(store.as_ref(), ORDERS_KEY).await?;
        let notifications: Option<Vec<Notification>> =
            load_collection(store.as_ref(), NOTIFICATIONS_KEY).await?;

        let needs_seed = menu_items.is_none() && config.seed_default_menu;
        let mut state = CafeState::from_snapshots(
            tables.unwrap_or_default(),
            menu_items.unwrap_or_default(),
            orders.unwrap_or_default(),
            notifications.unwrap_or_default(),
            config.notification_limit,
        );

        if needs_seed {
            for params in default_menu() {
                state.add_menu_item(params)?;
            }
            save_collection(store.as_ref(), MENU_ITEMS_KEY, state.menu_items()).await?;
            info!(items = state.menu_items().len(), "Seeded default menu");
        }

        let detector = NewOrderDetector::seeded(state.orders());
        let (sender, receiver) = mpsc::channel(config.channel_buffer.max(1));
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let client = CafeClient::new(sender, events.clone());

        let actor = Self {
            receiver,
            state,
            detector,
            store,
            events,
        };
        Ok((actor, client))
    }

    /// Runs the actor's event loop, processing messages until every client
    /// has been dropped.
    pub async fn run(mut self) {
        info!(
            tables = self.state.tables().len(),
            menu_items = self.state.menu_items().len(),
            orders = self.state.orders().len(),
            "Cafe actor started"
        );

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg).await;
        }

        info!(orders = self.state.orders().len(), "Shutdown");
    }

    async fn handle(&mut self, msg: CafeRequest) {
        match msg {
            CafeRequest::AddTable { respond_to } => {
                debug!("AddTable");
                let result = self
                    .mutate(|state| Ok((state.add_table()?, Changed::TABLES)))
                    .await;
                respond("AddTable", respond_to, result);
            }
            CafeRequest::DeleteTable { id, respond_to } => {
                debug!(%id, "DeleteTable");
                let result = self
                    .mutate(|state| state.delete_table(id).map(|()| ((), Changed::TABLES)))
                    .await;
                respond("DeleteTable", respond_to, result);
            }
            CafeRequest::UpdateTableStatus {
                id,
                status,
                respond_to,
            } => {
                debug!(%id, %status, "UpdateTableStatus");
                let result = self
                    .mutate(|state| {
                        state
                            .update_table_status(id, status)
                            .map(|table| (table, Changed::TABLES))
                    })
                    .await;
                respond("UpdateTableStatus", respond_to, result);
            }
            CafeRequest::AddMenuItem { params, respond_to } => {
                debug!(?params, "AddMenuItem");
                let result = self
                    .mutate(|state| {
                        state
                            .add_menu_item(params)
                            .map(|item| (item, Changed::MENU_ITEMS))
                    })
                    .await;
                respond("AddMenuItem", respond_to, result);
            }
            CafeRequest::DeleteMenuItem { id, respond_to } => {
                debug!(%id, "DeleteMenuItem");
                let result = self
                    .mutate(|state| state.delete_menu_item(id).map(|()| ((), Changed::MENU_ITEMS)))
                    .await;
                respond("DeleteMenuItem", respond_to, result);
            }
            CafeRequest::PlaceOrder {
                table_id,
                mut cart,
                respond_to,
            } => {
                debug!(%table_id, lines = cart.lines().len(), "PlaceOrder");
                let now = Utc::now();
                let result = self
                    .mutate(|state| {
                        let order = state.place_order(table_id, &mut cart, now)?;
                        let changed = Changed {
                            tables: true,
                            orders: true,
                            ..Changed::default()
                        };
                        Ok((order, changed))
                    })
                    .await;
                if let Ok(order) = &result {
                    info!(order_id = %order.id, table = order.table_number, total = order.total, "Order placed");
                    let _ = self.events.send(OrderEvent::NewOrder(order.clone()));
                }
                respond("PlaceOrder", respond_to, result);
            }
            CafeRequest::UpdateOrderStatus {
                id,
                status,
                respond_to,
            } => {
                debug!(%id, %status, "UpdateOrderStatus");
                let now = Utc::now();
                let before = self.state.order(id).map(|order| order.status);
                let result = self
                    .mutate(|state| state.update_order_status(id, status, now))
                    .await;
                if let Ok(order) = &result {
                    if before != Some(order.status) {
                        let _ = self.events.send(OrderEvent::UpdateOrder {
                            id: order.id,
                            status: order.status,
                        });
                    }
                }
                respond("UpdateOrderStatus", respond_to, result);
            }
            CafeRequest::AddNotification {
                message,
                kind,
                respond_to,
            } => {
                debug!(?kind, %message, "AddNotification");
                let now = Utc::now();
                let result = self
                    .mutate(|state| {
                        Ok((
                            state.add_notification(message, kind, now)?,
                            Changed::NOTIFICATIONS,
                        ))
                    })
                    .await;
                respond("AddNotification", respond_to, result);
            }
            CafeRequest::MarkAllRead { respond_to } => {
                debug!("MarkAllRead");
                let result = self
                    .mutate(|state| {
                        state.mark_all_read();
                        Ok(((), Changed::NOTIFICATIONS))
                    })
                    .await;
                respond("MarkAllRead", respond_to, result);
            }
            CafeRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(CafeSnapshot {
                    tables: self.state.tables().to_vec(),
                    menu_items: self.state.menu_items().to_vec(),
                    orders: self.state.orders().to_vec(),
                    notifications: self.state.notifications().to_vec(),
                }));
            }
            CafeRequest::Report { period, respond_to } => {
                debug!(%period, "Report");
                let _ = respond_to.send(Ok(self.state.report(period, &Local::now())));
            }
            CafeRequest::Sync { respond_to } => {
                let result = self.sync().await;
                match &result {
                    Ok(found) if !found.is_empty() => info!(new_orders = found.len(), "Sync"),
                    Ok(_) => debug!("Sync: nothing new"),
                    Err(e) => warn!(error = %e, "Sync failed"),
                }
                let _ = respond_to.send(result);
            }
        }
    }

    /// Apply `op` to a copy of the state, persist what it changed and commit.
    async fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut CafeState) -> Result<(T, Changed), CafeError>,
    ) -> Result<T, CafeError> {
        let mut next = self.state.clone();
        let (value, changed) = op(&mut next)?;
        if !changed.is_empty() {
            persist(self.store.as_ref(), &next, changed).await?;
        }
        self.state = next;
        Ok(value)
    }

    /// Reload tables, menu and orders from the store, then report orders the
    /// detector has never seen that are still pending. Each one gets a
    /// `new_order` notification.
    async fn sync(&mut self) -> Result<Vec<Order>, CafeError> {
        let store = self.store.as_ref();
        let orders: Option<Vec<Order>> = load_collection(store, ORDERS_KEY).await?;
        let tables: Option<Vec<Table>> = load_collection(store, TABLES_KEY).await?;
        let menu_items: Option<Vec<MenuItem>> = load_collection(store, MENU_ITEMS_KEY).await?;

        let mut next = self.state.clone();
        if let Some(orders) = orders {
            next.replace_orders(orders);
        }
        if let Some(tables) = tables {
            next.replace_tables(tables);
        }
        if let Some(menu_items) = menu_items {
            next.replace_menu_items(menu_items);
        }

        let mut detector = self.detector.clone();
        let found = detector.detect(next.orders());
        if !found.is_empty() {
            let now = Utc::now();
            for order in &found {
                next.add_notification(
                    format!("New order #{} from Table {}", order.id.0, order.table_number),
                    NotificationKind::NewOrder,
                    now,
                )?;
            }
            persist(store, &next, Changed::NOTIFICATIONS).await?;
        }

        self.state = next;
        self.detector = detector;
        Ok(found)
    }
}

/// Write the changed collections of `state`, orders first.
async fn persist(
    store: &dyn KeyValueStore,
    state: &CafeState,
    changed: Changed,
) -> Result<(), StorageError> {
    if changed.orders {
        save_collection(store, ORDERS_KEY, state.orders()).await?;
    }
    if changed.tables {
        save_collection(store, TABLES_KEY, state.tables()).await?;
    }
    if changed.menu_items {
        save_collection(store, MENU_ITEMS_KEY, state.menu_items()).await?;
    }
    if changed.notifications {
        save_collection(store, NOTIFICATIONS_KEY, state.notifications()).await?;
    }
    Ok(())
}

fn respond<T>(op: &'static str, respond_to: Response<T>, result: Result<T, CafeError>) {
    match &result {
        Ok(_) => info!(op, "ok"),
        Err(e) if e.is_rejection() => warn!(op, error = %e, "rejected"),
        Err(e) => warn!(op, error = %e, "failed"),
    }
    let _ = respond_to.send(result);
}
