use crate::model::{Order, OrderId};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Something that gets staff attention when a new order arrives.
pub trait AlertSink: Send + Sync {
    fn new_order(&self, order: &Order);
}

/// Writes the alert to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl AlertSink for LogAlert {
    fn new_order(&self, order: &Order) {
        info!(order_id = %order.id, table = order.table_number, "New order alert");
    }
}

/// Remembers which orders it was alerted for.
#[derive(Debug, Default, Clone)]
pub struct RecordingAlert {
    alerts: Arc<Mutex<Vec<OrderId>>>,
}

impl RecordingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<OrderId> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.alerts.lock().map(|alerts| alerts.len()).unwrap_or(0)
    }
}

impl AlertSink for RecordingAlert {
    fn new_order(&self, order: &Order) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(order.id);
        }
    }
}
