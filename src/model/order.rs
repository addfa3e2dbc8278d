//! Submitted customer orders.
//!
//! Orders are created at checkout from a [`Cart`](crate::model::Cart) snapshot,
//! change only through [`OrderStatus::transition`], and are never deleted so the
//! sales report keeps its history.

use crate::error::CafeError;
use crate::model::{MenuItem, MenuItemId, OrderId, TableId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Lifecycle of an order.
///
/// `Pending` is the initial state and `Completed` the terminal one. The
/// states in between are set by staff in whatever order the kitchen works;
/// no fixed graph is imposed on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
        }
    }

    /// An order still needs attention until it is completed.
    pub fn is_active(&self) -> bool {
        !matches!(self, OrderStatus::Completed)
    }

    /// Validate moving from `self` to `next`.
    ///
    /// Returns `Ok(None)` when nothing changes, `Ok(Some(next))` for a real
    /// transition.
    ///
    /// # Errors
    /// `InvalidState` when trying to leave `Completed`.
    pub fn transition(self, next: OrderStatus) -> Result<Option<OrderStatus>, CafeError> {
        if self == next {
            return Ok(None);
        }
        if self == OrderStatus::Completed {
            return Err(CafeError::InvalidState(format!(
                "completed orders cannot move back to {next}"
            )));
        }
        Ok(Some(next))
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CafeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "served" => Ok(OrderStatus::Served),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(CafeError::InvalidArgument(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

/// One line of a cart, and the frozen copy of it inside an [`Order`].
///
/// Name and price are copied from the menu item so later menu edits do not
/// rewrite order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            menu_item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub table_id: TableId,
    pub table_number: u32,
    pub items: Vec<CartLine>,
    pub total: f64,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order whose total is derived from `items`.
    pub fn new(
        id: OrderId,
        table_id: TableId,
        table_number: u32,
        items: Vec<CartLine>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let total = items.iter().map(CartLine::subtotal).sum();
        Self {
            id,
            table_id,
            table_number,
            items,
            total,
            status: OrderStatus::Pending,
            timestamp,
        }
    }
}
