//! # Cafe Client
//!
//! Provides a high-level API for interacting with the [`CafeActor`](crate::actor::CafeActor).
//! Each method sends one [`CafeRequest`] and awaits its one-shot reply.

use crate::actor::{CafeRequest, CafeSnapshot};
use crate::api::OrderEvent;
use crate::error::CafeError;
use crate::model::{
    Cart, MenuItem, MenuItemCreate, MenuItemId, Notification, NotificationKind, Order, OrderId,
    OrderStatus, Table, TableId, TableStatus,
};
use crate::report::{ReportPeriod, SalesReport};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, instrument};

/// A cloneable handle to the state actor.
///
/// The actor stops once every clone has been dropped.
#[derive(Clone)]
pub struct CafeClient {
    sender: mpsc::Sender<CafeRequest>,
    events: broadcast::Sender<OrderEvent>,
}

impl CafeClient {
    pub fn new(sender: mpsc::Sender<CafeRequest>, events: broadcast::Sender<OrderEvent>) -> Self {
        Self { sender, events }
    }

    /// Send a request built around a fresh reply channel and wait for the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, CafeError>>) -> CafeRequest,
    ) -> Result<T, CafeError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| CafeError::ActorClosed)?;
        response.await.map_err(|_| CafeError::ActorDropped)?
    }

    /// Whether the actor behind this client is still running.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Receive `new-order` and `update-order` events as they happen.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.events.subscribe()
    }

    // --- Tables ---

    #[instrument(skip(self))]
    pub async fn add_table(&self) -> Result<Table, CafeError> {
        debug!("Sending request");
        self.request(|respond_to| CafeRequest::AddTable { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_table(&self, id: TableId) -> Result<(), CafeError> {
        debug!("Sending request");
        self.request(|respond_to| CafeRequest::DeleteTable { id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_table_status(
        &self,
        id: TableId,
        status: TableStatus,
    ) -> Result<Table, CafeError> {
        debug!("Sending request");
        self.request(|respond_to| CafeRequest::UpdateTableStatus {
            id,
            status,
            respond_to,
        })
        .await
    }

    pub async fn tables(&self) -> Result<Vec<Table>, CafeError> {
        Ok(self.snapshot().await?.tables)
    }

    // --- Menu ---

    #[instrument(skip(self))]
    pub async fn add_menu_item(&self, params: MenuItemCreate) -> Result<MenuItem, CafeError> {
        debug!("Sending request");
        self.request(|respond_to| CafeRequest::AddMenuItem { params, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), CafeError> {
        debug!("Sending request");
        self.request(|respond_to| CafeRequest::DeleteMenuItem { id, respond_to })
            .await
    }

    pub async fn menu_items(&self) -> Result<Vec<MenuItem>, CafeError> {
        Ok(self.snapshot().await?.menu_items)
    }

    // --- Orders ---

    /// Check out `cart` for `table_id`.
    ///
    /// The cart is cleared only when the order was accepted; on any error it
    /// is left as the customer composed it.
    #[instrument(skip(self, cart), fields(lines = cart.lines().len()))]
    pub async fn place_order(
        &self,
        table_id: TableId,
        cart: &mut Cart,
    ) -> Result<OrderId, CafeError> {
        debug!("Sending request");
        if cart.is_empty() {
            return Err(CafeError::InvalidState("cannot place an empty order".into()));
        }
        let order = self
            .request(|respond_to| CafeRequest::PlaceOrder {
                table_id,
                cart: cart.clone(),
                respond_to,
            })
            .await?;
        cart.clear();
        Ok(order.id)
    }

    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, CafeError> {
        debug!("Sending request");
        self.request(|respond_to| CafeRequest::UpdateOrderStatus {
            id,
            status,
            respond_to,
        })
        .await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, CafeError> {
        Ok(self.snapshot().await?.orders)
    }

    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, CafeError> {
        Ok(self
            .snapshot()
            .await?
            .orders
            .into_iter()
            .find(|order| order.id == id))
    }

    // --- Notifications ---

    #[instrument(skip(self, message))]
    pub async fn add_notification(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Result<Notification, CafeError> {
        let message = message.into();
        self.request(|respond_to| CafeRequest::AddNotification {
            message,
            kind,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<(), CafeError> {
        self.request(|respond_to| CafeRequest::MarkAllRead { respond_to })
            .await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, CafeError> {
        Ok(self.snapshot().await?.notifications)
    }

    pub async fn unread_count(&self) -> Result<usize, CafeError> {
        Ok(self.snapshot().await?.unread_count())
    }

    // --- Queries ---

    /// All four collections as of one actor turn.
    pub async fn snapshot(&self) -> Result<CafeSnapshot, CafeError> {
        self.request(|respond_to| CafeRequest::Snapshot { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn report(&self, period: ReportPeriod) -> Result<SalesReport, CafeError> {
        self.request(|respond_to| CafeRequest::Report { period, respond_to })
            .await
    }

    /// Reload shared collections from the store and return newly arrived
    /// pending orders.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<Vec<Order>, CafeError> {
        self.request(|respond_to| CafeRequest::Sync { respond_to })
            .await
    }
}
