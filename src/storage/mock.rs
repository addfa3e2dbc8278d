//! # Mock Store & Failure Injection
//!
//! [`MockStore`] behaves like a [`MemoryStore`] until a scripted response
//! matches a call. Scripts are queued with a fluent builder and consumed in
//! order, one per matching call:
//!
//! ```rust
//! use cafe_orders::storage::mock::MockStore;
//! use cafe_orders::storage::{KeyValueStore, ORDERS_KEY};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockStore::new();
//!     mock.expect_set(ORDERS_KEY).return_err("disk full");
//!
//!     assert!(mock.set(ORDERS_KEY, "[]".into()).await.is_err());
//!     // The script is used up; the next write goes through.
//!     assert!(mock.set(ORDERS_KEY, "[]".into()).await.is_ok());
//!     mock.verify();
//! }
//! ```
//!
//! | Need | Use |
//! |------|-----|
//! | Backend outage on read | `expect_get(key).return_err(..)` |
//! | Backend outage on write | `expect_set(key).return_err(..)` |
//! | Torn or garbage snapshot | `expect_get(key).return_raw(..)` |
//! | Assert what was touched | [`MockStore::calls`] |

use super::{KeyValueStore, MemoryStore, StorageError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Kind of store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Set,
}

/// A recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub key: String,
}

enum Scripted {
    Fail(String),
    Raw(String),
}

struct Expectation {
    op: StoreOp,
    key: String,
    response: Scripted,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// Pass-through store with scripted failures and a call log.
#[derive(Default)]
pub struct MockStore {
    inner: MemoryStore,
    expectations: Expectations,
    calls: Mutex<Vec<StoreCall>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `get` of `key`.
    pub fn expect_get(&self, key: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            op: StoreOp::Get,
            key: key.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Script the next `set` of `key`.
    pub fn expect_set(&self, key: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            op: StoreOp::Set,
            key: key.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Keys written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.op == StoreOp::Set)
            .map(|call| call.key)
            .collect()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    /// Panics if scripted responses were never consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().map(|e| e.len()).unwrap_or(0);
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn record(&self, op: StoreOp, key: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(StoreCall {
                op,
                key: key.to_string(),
            });
        }
    }

    fn take_scripted(&self, op: StoreOp, key: &str) -> Option<Scripted> {
        let mut exps = self.expectations.lock().ok()?;
        let pos = exps.iter().position(|e| e.op == op && e.key == key)?;
        exps.remove(pos).map(|e| e.response)
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.record(StoreOp::Get, key);
        match self.take_scripted(StoreOp::Get, key) {
            Some(Scripted::Fail(message)) => Err(StorageError::Backend(message)),
            Some(Scripted::Raw(raw)) => Ok(Some(raw)),
            None => self.inner.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.record(StoreOp::Set, key);
        match self.take_scripted(StoreOp::Set, key) {
            Some(Scripted::Fail(message)) => Err(StorageError::Backend(message)),
            // A scripted raw write stores the scripted value instead.
            Some(Scripted::Raw(raw)) => self.inner.set(key, raw).await,
            None => self.inner.set(key, value).await,
        }
    }
}

/// Builder for a scripted response.
pub struct ExpectationBuilder {
    op: StoreOp,
    key: String,
    expectations: Expectations,
}

impl ExpectationBuilder {
    /// Fail the call with a backend error.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Scripted::Fail(message.into()));
    }

    /// Answer a `get` with `raw` instead of the stored value.
    pub fn return_raw(self, raw: impl Into<String>) {
        self.push(Scripted::Raw(raw.into()));
    }

    fn push(self, response: Scripted) {
        if let Ok(mut exps) = self.expectations.lock() {
            exps.push_back(Expectation {
                op: self.op,
                key: self.key,
                response,
            });
        }
    }
}
