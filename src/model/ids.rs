//! Type-safe identifiers.
//!
//! Each collection allocates its own sequential `u32` ids. The newtypes keep a
//! `TableId` from being passed where an `OrderId` is expected, and render with a
//! readable prefix (`order_7`) in logs and error messages.

use crate::error::CafeError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Table`](crate::model::Table).
    TableId,
    "table"
);
define_id!(
    /// Identifier of a [`MenuItem`](crate::model::MenuItem).
    MenuItemId,
    "item"
);
define_id!(
    /// Identifier of an [`Order`](crate::model::Order).
    OrderId,
    "order"
);
define_id!(
    /// Identifier of a [`Notification`](crate::model::Notification).
    NotificationId,
    "notification"
);

/// Sequential id allocator for one collection.
///
/// After a reload the allocator is bumped past the largest loaded id so new
/// entities never collide with persisted ones.
#[derive(Debug, Clone)]
pub struct IdSequence {
    /// Wider than the ids so that observing `u32::MAX` cannot overflow.
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    /// Allocate the next id, or `InvalidState` once every `u32` is taken.
    pub fn next<I: From<u32>>(&mut self) -> Result<I, CafeError> {
        let id = u32::try_from(self.next)
            .map_err(|_| CafeError::InvalidState("no ids left to allocate".into()))?;
        self.next += 1;
        Ok(I::from(id))
    }

    /// Make sure the next id is greater than `seen`.
    pub fn observe(&mut self, seen: u32) {
        self.next = self.next.max(u64::from(seen) + 1);
    }
}
