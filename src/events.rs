use std::fmt;

use crate::models::ClusterStatus;

/// Why the matcher dropped a cluster from a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    NotActive(ClusterStatus),
    InsufficientCpus { available: u32, requested: u64 },
    InsufficientMemory { available: u64, requested: u64 },
    InsufficientGpus { available: u32, requested: u64 },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::NotActive(status) => write!(f, "status is {}", status),
            ExclusionReason::InsufficientCpus { available, requested } => {
                write!(f, "insufficient CPUs ({} < {})", available, requested)
            }
            ExclusionReason::InsufficientMemory { available, requested } => {
                write!(f, "insufficient memory ({} < {} GB)", available, requested)
            }
            ExclusionReason::InsufficientGpus { available, requested } => {
                write!(f, "insufficient GPUs ({} < {})", available, requested)
            }
        }
    }
}

/// Structured events emitted by the broker core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerEvent {
    ClusterExcluded {
        cluster: String,
        reason: ExclusionReason,
    },
    ClusterAccepted {
        cluster: String,
    },
    MatchCompleted {
        considered: usize,
        matched: usize,
    },
    RegistryRefreshed {
        source: String,
        clusters: usize,
    },
    RegistryRefreshFailed {
        source: String,
        reason: String,
    },
    SessionRequested {
        session_id: String,
        cluster: String,
        research_item: String,
        cpu_count: i64,
        memory: Option<String>,
        gpu_count: i64,
        wall_time_minutes: i64,
        dependencies: Vec<String>,
        storage: Option<String>,
        ide: Option<String>,
    },
}

/// Observability sink injected into the registry, matcher and session intake
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BrokerEvent);
}

/// Discards every event
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: BrokerEvent) {}
}

/// Renders events through `tracing`
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: BrokerEvent) {
        match event {
            BrokerEvent::ClusterExcluded { cluster, reason } => {
                tracing::debug!(cluster = %cluster, reason = %reason, "Cluster filtered out");
            }
            BrokerEvent::ClusterAccepted { cluster } => {
                tracing::debug!(cluster = %cluster, "Cluster meets constraints");
            }
            BrokerEvent::MatchCompleted { considered, matched } => {
                tracing::info!(considered, matched, "Constraint match completed");
            }
            BrokerEvent::RegistryRefreshed { source, clusters } => {
                tracing::info!(source = %source, clusters, "Cluster registry refreshed");
            }
            BrokerEvent::RegistryRefreshFailed { source, reason } => {
                tracing::warn!(source = %source, reason = %reason, "Cluster registry refresh failed");
            }
            BrokerEvent::SessionRequested {
                session_id,
                cluster,
                research_item,
                cpu_count,
                memory,
                gpu_count,
                wall_time_minutes,
                dependencies,
                storage,
                ide,
            } => {
                tracing::info!(
                    session_id = %session_id,
                    cluster = %cluster,
                    research_item = %research_item,
                    cpu_count,
                    memory = memory.as_deref().unwrap_or("N/A"),
                    gpu_count,
                    wall_time_minutes,
                    dependencies = %dependencies.join(","),
                    storage = storage.as_deref().unwrap_or("none"),
                    ide = ide.as_deref().unwrap_or("none"),
                    "Session requested"
                );
            }
        }
    }
}

/// Keeps every event in memory for assertions
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<BrokerEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn events(&self) -> Vec<BrokerEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&self, event: BrokerEvent) {
        self.events.lock().unwrap().push(event);
    }
}
