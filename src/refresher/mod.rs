use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::registry::{InventorySource, RegistryHandle};

/// Registry refresher periodically reloads the fleet from the inventory source
pub struct RegistryRefresher {
    registry: RegistryHandle,
    source: Arc<dyn InventorySource>,
    every: Duration,
    timeout: Duration,
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl RegistryRefresher {
    pub fn new(
        registry: RegistryHandle,
        source: Arc<dyn InventorySource>,
        every: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            source,
            every,
            timeout,
            stop_tx: None,
        }
    }

    /// Start the refresher
    pub fn start(&mut self) {
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let registry = self.registry.clone();
        let source = self.source.clone();
        let every = self.every;
        let timeout = self.timeout;

        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately and the registry is already loaded
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // failures are reported through the event sink; the old snapshot stays
                        let _ = registry.refresh(source.as_ref(), timeout).await;
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Registry refresher stopped");
                        break;
                    }
                }
            }
        });
    }

    /// Stop the refresher
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::models::ClusterRecord;
    use crate::registry::{demo_fleet, ClusterRegistry};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns one more demo cluster on every load
    struct GrowingInventory {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl InventorySource for GrowingInventory {
        fn name(&self) -> &str {
            "growing"
        }

        async fn load(&self) -> anyhow::Result<Vec<ClusterRecord>> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(demo_fleet().into_iter().take(n).collect())
        }
    }

    #[tokio::test]
    async fn test_refresher_reloads_until_stopped() {
        let handle = RegistryHandle::new(ClusterRegistry::empty(), Arc::new(RecordingSink::default()));
        let source = Arc::new(GrowingInventory { loads: AtomicUsize::new(0) });
        let mut refresher = RegistryRefresher::new(
            handle.clone(),
            source.clone(),
            Duration::from_millis(10),
            Duration::from_secs(1),
        );
        refresher.start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        refresher.stop();
        assert!(handle.snapshot().len() >= 2);

        tokio::time::sleep(Duration::from_millis(30)).await;
        let loads = source.loads.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.loads.load(Ordering::SeqCst), loads);
    }
}
