use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ClusterClass, ClusterRecord, ClusterStatus};

/// Supplies ClusterRecords to the registry at load time or on refresh
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Short identifier used in logs and events
    fn name(&self) -> &str;

    /// Fetch the full fleet in declaration order
    async fn load(&self) -> Result<Vec<ClusterRecord>>;
}

/// Fixed in-process inventory
pub struct StaticInventory {
    clusters: Vec<ClusterRecord>,
}

impl StaticInventory {
    pub fn new(clusters: Vec<ClusterRecord>) -> Self {
        Self { clusters }
    }

    /// The demo fleet of the reference deployment
    pub fn demo() -> Self {
        Self::new(demo_fleet())
    }
}

#[async_trait]
impl InventorySource for StaticInventory {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<Vec<ClusterRecord>> {
        Ok(self.clusters.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn cluster(
    name: &str,
    max_cpus: u32,
    memory_gb: u64,
    gpu_description: &str,
    gpu_count: u32,
    jobs_in_queue: u32,
    owner: &str,
    class: ClusterClass,
    status: ClusterStatus,
) -> ClusterRecord {
    ClusterRecord {
        name: name.to_string(),
        max_cpus,
        memory_gb,
        gpu_count,
        gpu_description: gpu_description.to_string(),
        jobs_in_queue,
        owner: owner.to_string(),
        class,
        status,
    }
}

/// Five clusters: four active, bridges-cpu under maintenance
pub fn demo_fleet() -> Vec<ClusterRecord> {
    use ClusterClass::*;
    use ClusterStatus::*;

    vec![
        cluster("expanse-cpu", 128, 256, "No", 0, 10, "ndeshan.b@gmail.com", Hpc, Active),
        cluster("expanse-cpu-test", 128, 256, "No", 0, 20, "ndeshan.b@gmail.com", Hpc, Active),
        cluster("expanse-gpu", 96, 192, "A100 GPUs", 4, 5, "ndeshan.b@gmail.com", Hpc, Active),
        cluster("jetstream-cloud", 64, 128, "V100 GPUs", 2, 3, "admin@cybershuttle.org", Cloud, Active),
        cluster("bridges-cpu", 256, 512, "No", 0, 15, "admin@cybershuttle.org", Hpc, Maintenance),
    ]
}
