//! # Cafe Orders
//!
//! > **The state core of a table-side café ordering system.**
//!
//! Customers scan a table's QR code, build a cart from the menu and check out.
//! Staff watch a live order queue, move orders through their lifecycle, manage
//! tables and the menu, and read sales reports. This crate owns the state
//! behind both views and keeps it in step with a shared key-value store.
//!
//! ## 🏗️ Design
//!
//! ### One writer
//! All state lives in a [`CafeState`](state::CafeState) owned by a single
//! [`CafeActor`](actor::CafeActor). Requests arrive one at a time over an mpsc
//! channel, so checkout (create the order, occupy the table, clear the cart)
//! is a single atomic step for every caller.
//!
//! ### Commit after write
//! A mutation runs on a copy of the state. The collections it changed are
//! written to the [`KeyValueStore`](storage::KeyValueStore) as whole JSON
//! snapshots, and only then does the copy become the live state. A storage
//! failure returns [`CafeError::StorageUnavailable`](error::CafeError) with
//! memory untouched.
//!
//! ### Polling reconciliation
//! Other sessions write to the same store. The [`Watcher`](watcher::Watcher)
//! asks the actor to reload on an interval (and on push events), and the
//! [`NewOrderDetector`](state::NewOrderDetector) reports each pending order
//! exactly once.
//!
//! ### Typed errors
//! Every fallible operation returns `Result<_, CafeError>`. Rejections
//! (`InvalidArgument`, `InvalidState`, `NotFound`) never change state.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: tables, menu items, carts, orders, notifications, typed ids.
//! - [`state`]: the collections and every rule that ties them together.
//! - [`report`]: period filters and sales aggregation.
//! - [`storage`]: the store trait, an in-memory store and a scripted mock.
//! - [`actor`] / [`clients`]: the single writer and its async façade.
//! - [`watcher`]: background sync and new-order alerts.
//! - [`api`]: request bodies, handlers and push events for a transport layer.
//! - [`lifecycle`]: [`CafeSystem`](lifecycle::CafeSystem) and tracing setup.
//! - [`config`]: YAML configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! CAFE_CONFIG=cafe.yaml RUST_LOG=debug cargo run
//! cargo test
//! ```

pub mod actor;
pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod report;
pub mod state;
pub mod storage;
pub mod watcher;
