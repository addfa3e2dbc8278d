//! Pure data structures for tables, menu items, carts, orders and notifications.
//!
//! Everything here is plain data with serde derives; the rules that tie the
//! collections together live in [`CafeState`](crate::state::CafeState).

pub mod cart;
pub mod ids;
pub mod menu;
pub mod notification;
pub mod order;
pub mod table;

pub use cart::*;
pub use ids::*;
pub use menu::*;
pub use notification::*;
pub use order::*;
pub use table::*;
