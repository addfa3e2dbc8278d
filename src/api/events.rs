use crate::model::{Order, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};

/// A change to the order queue, published by the actor on its broadcast
/// channel.
///
/// Serialized with the event name in an `event` field and the payload in
/// `data`, e.g. `{"event":"update-order","data":{"id":3,"status":"ready"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OrderEvent {
    NewOrder(Order),
    UpdateOrder { id: OrderId, status: OrderStatus },
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::NewOrder(order) => order.id,
            OrderEvent::UpdateOrder { id, .. } => *id,
        }
    }
}

/// A staff-side view of the order queue kept current by applying events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFeed {
    /// Newest first.
    orders: Vec<Order>,
}

impl OrderFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a full listing, oldest first as the store keeps it.
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            orders: orders.iter().rev().cloned().collect(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Apply one event. Returns `false` when the event changed nothing: a
    /// repeated `new-order`, or an `update-order` for an order not in the feed.
    pub fn apply(&mut self, event: &OrderEvent) -> bool {
        let existing = self.orders.iter().position(|o| o.id == event.order_id());
        match (event, existing) {
            (OrderEvent::NewOrder(order), None) => {
                self.orders.insert(0, order.clone());
                true
            }
            (OrderEvent::UpdateOrder { status, .. }, Some(idx)) => {
                self.orders[idx].status = *status;
                true
            }
            (OrderEvent::NewOrder(_), Some(_)) | (OrderEvent::UpdateOrder { .. }, None) => false,
        }
    }
}
