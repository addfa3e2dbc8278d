//! The customer's unsubmitted order.

use crate::model::{CartLine, MenuItem, MenuItemId};

/// Line items a customer is composing before checkout.
///
/// A cart belongs to one table session and never reaches the store; on a
/// successful checkout it is copied into an [`Order`](crate::model::Order) and
/// cleared. Every line always has `quantity >= 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, id: MenuItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.menu_item_id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Add one unit of `item`. A line already at `u32::MAX` stays there.
    pub fn add(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|line| line.menu_item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_item(item, 1)),
        }
    }

    /// Change a line's quantity by `delta`. A result of zero or less drops
    /// the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: MenuItemId, delta: i64) {
        let Some(pos) = self.lines.iter().position(|line| line.menu_item_id == id) else {
            return;
        };
        let next = i64::from(self.lines[pos].quantity) + delta;
        if next <= 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    /// Set the quantity of `item` directly, as the numeric menu input does.
    /// Zero removes the line.
    pub fn set_quantity(&mut self, item: &MenuItem, quantity: u32) {
        let pos = self.lines.iter().position(|line| line.menu_item_id == item.id);
        match (pos, quantity) {
            (Some(pos), 0) => {
                self.lines.remove(pos);
            }
            (Some(pos), quantity) => self.lines[pos].quantity = quantity,
            (None, 0) => {}
            (None, quantity) => self.lines.push(CartLine::from_item(item, quantity)),
        }
    }

    pub fn remove(&mut self, id: MenuItemId) {
        self.lines.retain(|line| line.menu_item_id != id);
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
