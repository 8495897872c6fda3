//! JSON shapes exchanged with the HTTP transport. The registry and matcher
//! never see these types; handlers convert at the edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClusterRecord, ResourceRequest};
use crate::error::BrokerError;

/// Wire representation of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub name: String,
    #[serde(rename = "maxCPUs")]
    pub max_cpus: u32,
    /// Approximate display string, e.g. "~256 GB"
    pub memory: String,
    pub gpu_support: String,
    pub jobs_in_queue: u32,
    pub owned_by: String,
    pub cluster_type: String,
    pub status: String,
}

impl From<&ClusterRecord> for ClusterView {
    fn from(record: &ClusterRecord) -> Self {
        Self {
            name: record.name.clone(),
            max_cpus: record.max_cpus,
            memory: format!("~{} GB", record.memory_gb),
            gpu_support: record.gpu_description.clone(),
            jobs_in_queue: record.jobs_in_queue,
            owned_by: record.owner.clone(),
            cluster_type: record.class.as_str().to_string(),
            status: record.status.as_str().to_string(),
        }
    }
}

/// Constraint payload as sent by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsPayload {
    #[serde(default)]
    pub cpu_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default)]
    pub gpu_count: i64,
    /// Minutes. Advisory only: carried through to the session event, never validated
    #[serde(default)]
    pub wall_time: i64,
}

impl TryFrom<ConstraintsPayload> for ResourceRequest {
    type Error = BrokerError;

    fn try_from(p: ConstraintsPayload) -> Result<Self, Self::Error> {
        let cpu_count = p
            .cpu_count
            .ok_or_else(|| BrokerError::invalid("cpu count is required"))?;
        Ok(Self {
            cpu_count,
            memory: p.memory,
            gpu_count: p.gpu_count,
            wall_time_minutes: p.wall_time,
        })
    }
}

/// Query parameters for the filter endpoint
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// "queue" applies the queue-depth ranking pass
    #[serde(default)]
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDependencies {
    #[serde(default)]
    pub conda: bool,
    #[serde(default)]
    pub pip: bool,
}

impl SessionDependencies {
    pub fn enabled(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.conda {
            out.push("conda".to_string());
        }
        if self.pip {
            out.push("pip".to_string());
        }
        out
    }
}

/// SessionInfo is the selection a user confirmed after reviewing matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub research_item: String,
    pub cluster: String,
    pub constraints: ConstraintsPayload,
    #[serde(default)]
    pub dependencies: SessionDependencies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ide: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartResponse {
    pub success: bool,
    pub session_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session_info: SessionInfo,
}
