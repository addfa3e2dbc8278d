use crate::actor::CafeActor;
use crate::clients::CafeClient;
use crate::config::CafeConfig;
use crate::error::CafeError;
use crate::storage::KeyValueStore;
use crate::watcher::{AlertSink, Watcher, WatcherHandle};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime for one café session: the state actor plus its watcher.
///
/// Several systems may share one store; each one sees the others' orders on
/// its next sync.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let system = CafeSystem::start(store, CafeConfig::default(), Some(Arc::new(LogAlert))).await?;
///
/// let table = system.client.add_table().await?;
/// let order_id = system.client.place_order(table.id, &mut cart).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CafeSystem {
    /// Client for the state actor
    pub client: CafeClient,

    watcher: WatcherHandle,
    actor: JoinHandle<()>,
}

impl CafeSystem {
    /// Load state from `store`, spawn the actor and start the watcher.
    ///
    /// `alert` is only used when `config.sound_alerts` is set. A config that
    /// fails [`CafeConfig::validate`] is `InvalidArgument` and nothing starts.
    pub async fn start(
        store: Arc<dyn KeyValueStore>,
        config: CafeConfig,
        alert: Option<Arc<dyn AlertSink>>,
    ) -> Result<Self, CafeError> {
        config
            .validate()
            .map_err(|e| CafeError::InvalidArgument(format!("{e:#}")))?;
        let (actor, client) = CafeActor::load(store, &config).await?;
        let actor = tokio::spawn(actor.run());

        let alert = alert.filter(|_| config.sound_alerts);
        let watcher = Watcher::new(
            client.clone(),
            config.poll_interval(),
            config.push_updates,
            alert,
        )
        .spawn();

        info!(
            poll_interval_ms = config.poll_interval_ms,
            push = config.push_updates,
            "Cafe system started"
        );
        Ok(Self {
            client,
            watcher,
            actor,
        })
    }

    /// Stop the watcher, close the actor's channel and wait for it to finish.
    ///
    /// Clones of [`CafeSystem::client`] held elsewhere keep the actor alive;
    /// drop them first.
    pub async fn shutdown(self) -> Result<(), CafeError> {
        info!("Shutting down cafe system...");

        self.watcher.stop().await;
        drop(self.client);

        if let Err(e) = self.actor.await {
            error!("Actor task failed: {:?}", e);
            return Err(CafeError::ActorDropped);
        }

        info!("Cafe system shutdown complete.");
        Ok(())
    }
}
