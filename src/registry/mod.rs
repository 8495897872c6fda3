mod handle;
mod inventory;

pub use handle::RegistryHandle;
pub use inventory::{demo_fleet, InventorySource, StaticInventory};

use anyhow::{bail, Result};
use std::collections::HashSet;

use crate::models::{denotes_no_gpu, ClusterRecord};

/// ClusterRegistry is an immutable snapshot of the fleet in declaration order.
/// A new snapshot replaces the old one on refresh; it is never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterRegistry {
    clusters: Vec<ClusterRecord>,
}

impl ClusterRegistry {
    /// Build a registry, validating unique names and the no-GPU description rule
    pub fn new(clusters: Vec<ClusterRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(clusters.len());
        for cluster in &clusters {
            if cluster.name.trim().is_empty() {
                bail!("cluster name must not be empty");
            }
            if !seen.insert(cluster.name.as_str()) {
                bail!("duplicate cluster name '{}'", cluster.name);
            }
            if cluster.gpu_count == 0 && !denotes_no_gpu(&cluster.gpu_description) {
                bail!(
                    "cluster '{}' has no GPUs but describes them as '{}'",
                    cluster.name,
                    cluster.gpu_description
                );
            }
        }
        Ok(Self { clusters })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Every record regardless of status, in registration order
    pub fn list_all(&self) -> &[ClusterRecord] {
        &self.clusters
    }

    pub fn get(&self, name: &str) -> Option<&ClusterRecord> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
