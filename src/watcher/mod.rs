//! # Order Watcher
//!
//! A background task that keeps the actor's view of the shared store current.
//! It asks the actor to [`sync`](CafeClient::sync) on a fixed interval and,
//! when push updates are enabled, whenever a `new-order` event is published.
//! Every order the sync reports as new is handed to the [`AlertSink`].
//!
//! The watcher stops when [`WatcherHandle::stop`] is called or when the actor
//! is no longer reachable. A failed sync is logged and retried on the next
//! trigger.

mod alert;

pub use alert::{AlertSink, LogAlert, RecordingAlert};

use crate::api::OrderEvent;
use crate::clients::CafeClient;
use crate::error::CafeError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest poll period; `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct Watcher {
    client: CafeClient,
    poll_interval: Duration,
    push: bool,
    alert: Option<Arc<dyn AlertSink>>,
    shutdown: CancellationToken,
}

impl Watcher {
    /// `alert` is `None` when sound alerts are disabled. A zero
    /// `poll_interval` is raised to one millisecond.
    pub fn new(
        client: CafeClient,
        poll_interval: Duration,
        push: bool,
        alert: Option<Arc<dyn AlertSink>>,
    ) -> Self {
        Self {
            client,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            push,
            alert,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn spawn(self) -> WatcherHandle {
        let shutdown = self.shutdown.clone();
        let handle = tokio::spawn(self.run());
        WatcherHandle { shutdown, handle }
    }

    async fn run(self) {
        info!(interval_ms = self.poll_interval.as_millis() as u64, push = self.push, "Watcher started");

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // skip immediate tick

        let mut events = self.push.then(|| self.client.subscribe());

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Watcher received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {}
                result = next_event(&mut events) => match result {
                    Ok(OrderEvent::NewOrder(order)) => debug!(order_id = %order.id, "Push: new order"),
                    Ok(OrderEvent::UpdateOrder { .. }) => continue,
                    Err(RecvError::Lagged(n)) => warn!(skipped = n, "Watcher lagged behind order events"),
                    Err(RecvError::Closed) => {
                        events = None;
                        continue;
                    }
                }
            }

            if !self.poll().await {
                break;
            }
        }

        info!("Watcher stopped");
    }

    /// One reconciliation. Returns `false` once the actor is gone.
    async fn poll(&self) -> bool {
        match self.client.sync().await {
            Ok(found) => {
                if let Some(alert) = &self.alert {
                    for order in &found {
                        alert.new_order(order);
                    }
                }
                true
            }
            Err(CafeError::ActorClosed | CafeError::ActorDropped) => {
                info!("Actor unavailable, watcher exiting");
                false
            }
            Err(e) => {
                warn!(error = %e, "Sync failed, retrying on next trigger");
                true
            }
        }
    }
}

async fn next_event(
    events: &mut Option<broadcast::Receiver<OrderEvent>>,
) -> Result<OrderEvent, RecvError> {
    match events {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

/// Handle to a running [`Watcher`].
pub struct WatcherHandle {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl WatcherHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the watcher and wait for its task to end.
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Watcher task ended abnormally");
        }
    }
}
