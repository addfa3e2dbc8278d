//! New-order detection over repeated fetches of the order collection.

use crate::model::{Order, OrderId, OrderStatus};
use std::collections::HashSet;

/// Remembers every order id it has observed and reports first sightings of
/// pending orders.
///
/// The detector is transport-agnostic: feed it whatever the last poll or push
/// delivered. An id is remembered as soon as it is seen, whatever its status,
/// so an order is surfaced at most once even if it later goes back to
/// pending. An order missing from a torn read is simply reported on the next
/// fetch that contains it.
#[derive(Debug, Clone, Default)]
pub struct NewOrderDetector {
    seen: HashSet<OrderId>,
}

impl NewOrderDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a collection that is already known, without reporting it.
    pub fn seeded<'a>(known: impl IntoIterator<Item = &'a Order>) -> Self {
        Self {
            seen: known.into_iter().map(|order| order.id).collect(),
        }
    }

    pub fn has_seen(&self, id: OrderId) -> bool {
        self.seen.contains(&id)
    }

    /// Orders in `fresh` never observed before and still pending, in
    /// collection order.
    pub fn detect(&mut self, fresh: &[Order]) -> Vec<Order> {
        fresh
            .iter()
            .filter(|order| self.seen.insert(order.id) && order.status == OrderStatus::Pending)
            .cloned()
            .collect()
    }
}
