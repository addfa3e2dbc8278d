//! # System Lifecycle
//!
//! [`CafeSystem`] wires a session together: it loads state from the store,
//! spawns the [`CafeActor`](crate::actor::CafeActor), starts the
//! [`Watcher`](crate::watcher::Watcher) on a clone of the client, and tears
//! all of it down again in order.
//!
//! ## Shutdown
//!
//! 1. Cancel the watcher and wait for it, which drops its client clone.
//! 2. Drop the system's own client, closing the actor's channel.
//! 3. The actor drains what is queued, logs its final state and returns.
//! 4. Await the actor task.

pub mod cafe_system;
pub mod tracing;

pub use cafe_system::*;
pub use tracing::*;
