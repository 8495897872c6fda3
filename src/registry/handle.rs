use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::{ClusterRegistry, InventorySource};
use crate::error::BrokerError;
use crate::events::{BrokerEvent, EventSink};

/// Shared handle to the current registry snapshot.
///
/// Readers take an `Arc` of the snapshot and match against it without
/// holding the lock, so a refresh never blocks or tears an in-flight match.
#[derive(Clone)]
pub struct RegistryHandle {
    current: Arc<RwLock<Arc<ClusterRegistry>>>,
    events: Arc<dyn EventSink>,
}

impl RegistryHandle {
    pub fn new(registry: ClusterRegistry, events: Arc<dyn EventSink>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
            events,
        }
    }

    /// Load the first snapshot from a source
    pub async fn load(
        source: &dyn InventorySource,
        timeout: Duration,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, BrokerError> {
        let handle = Self::new(ClusterRegistry::empty(), events);
        handle.refresh(source, timeout).await?;
        Ok(handle)
    }

    pub fn snapshot(&self) -> Arc<ClusterRegistry> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the snapshot with a fresh one from `source`.
    /// On any failure the previous snapshot stays in place.
    pub async fn refresh(
        &self,
        source: &dyn InventorySource,
        timeout: Duration,
    ) -> Result<usize, BrokerError> {
        match fetch(source, timeout).await {
            Ok(registry) => {
                let count = registry.len();
                {
                    let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
                    *guard = Arc::new(registry);
                }
                self.events.emit(BrokerEvent::RegistryRefreshed {
                    source: source.name().to_string(),
                    clusters: count,
                });
                Ok(count)
            }
            Err(reason) => {
                self.events.emit(BrokerEvent::RegistryRefreshFailed {
                    source: source.name().to_string(),
                    reason: reason.clone(),
                });
                Err(BrokerError::unavailable(reason))
            }
        }
    }
}

async fn fetch(source: &dyn InventorySource, timeout: Duration) -> Result<ClusterRegistry, String> {
    let records = match tokio::time::timeout(timeout, source.load()).await {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => return Err(format!("{} inventory failed: {:#}", source.name(), e)),
        Err(_) => {
            return Err(format!(
                "{} inventory did not respond within {} ms",
                source.name(),
                timeout.as_millis()
            ))
        }
    };
    ClusterRegistry::new(records)
        .map_err(|e| format!("{} inventory returned an invalid fleet: {:#}", source.name(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::models::ClusterRecord;
    use crate::registry::{demo_fleet, StaticInventory};
    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    struct SlowInventory;

    #[async_trait]
    impl InventorySource for SlowInventory {
        fn name(&self) -> &str {
            "slow"
        }

        async fn load(&self) -> anyhow::Result<Vec<ClusterRecord>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(demo_fleet())
        }
    }

    struct BrokenInventory;

    #[async_trait]
    impl InventorySource for BrokenInventory {
        fn name(&self) -> &str {
            "broken"
        }

        async fn load(&self) -> anyhow::Result<Vec<ClusterRecord>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_load_populates_snapshot() {
        let sink = Arc::new(RecordingSink::default());
        let handle = assert_ok!(
            RegistryHandle::load(&StaticInventory::demo(), Duration::from_secs(1), sink.clone()).await
        );
        assert_eq!(handle.snapshot().len(), 5);
        assert_eq!(
            sink.events(),
            vec![BrokerEvent::RegistryRefreshed { source: "static".into(), clusters: 5 }]
        );
    }

    #[tokio::test]
    async fn test_refresh_timeout_is_registry_unavailable() {
        let handle = RegistryHandle::new(
            ClusterRegistry::new(demo_fleet()).unwrap(),
            Arc::new(RecordingSink::default()),
        );
        let err = assert_err!(handle.refresh(&SlowInventory, Duration::from_millis(50)).await);
        assert!(matches!(err, BrokerError::RegistryUnavailable(_)));
        // previous snapshot survives
        assert_eq!(handle.snapshot().len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_snapshot() {
        let sink = Arc::new(RecordingSink::default());
        let handle = RegistryHandle::new(ClusterRegistry::new(demo_fleet()).unwrap(), sink.clone());
        let before = handle.snapshot();

        let err = assert_err!(handle.refresh(&BrokenInventory, Duration::from_secs(1)).await);
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(*handle.snapshot(), *before);
        assert!(matches!(
            sink.events().as_slice(),
            [BrokerEvent::RegistryRefreshFailed { .. }]
        ));
    }

    #[tokio::test]
    async fn test_invalid_fleet_is_rejected() {
        let mut fleet = demo_fleet();
        fleet.push(fleet[0].clone());
        let handle = RegistryHandle::new(ClusterRegistry::empty(), Arc::new(RecordingSink::default()));
        let err = assert_err!(handle.refresh(&StaticInventory::new(fleet), Duration::from_secs(1)).await);
        assert!(err.to_string().contains("duplicate"));
        assert!(handle.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_outlives_refresh() {
        let handle = RegistryHandle::new(ClusterRegistry::empty(), Arc::new(RecordingSink::default()));
        let old = handle.snapshot();
        assert_ok!(handle.refresh(&StaticInventory::demo(), Duration::from_secs(1)).await);
        assert!(old.is_empty());
        assert_eq!(handle.snapshot().len(), 5);
    }
}
