use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheduling family a cluster belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterClass {
    Hpc,
    Cloud,
    Other,
}

impl ClusterClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterClass::Hpc => "HPC",
            ClusterClass::Cloud => "Cloud",
            ClusterClass::Other => "Other",
        }
    }

    /// Lenient parse: anything that is not HPC or Cloud is `Other`
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("hpc") {
            ClusterClass::Hpc
        } else if s.eq_ignore_ascii_case("cloud") {
            ClusterClass::Cloud
        } else {
            ClusterClass::Other
        }
    }
}

impl fmt::Display for ClusterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status. Only `Active` clusters are ever eligible for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterStatus {
    Active,
    Maintenance,
    Offline,
}

impl ClusterStatus {
    pub const ALL: [ClusterStatus; 3] = [
        ClusterStatus::Active,
        ClusterStatus::Maintenance,
        ClusterStatus::Offline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterStatus::Active => "active",
            ClusterStatus::Maintenance => "maintenance",
            ClusterStatus::Offline => "offline",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ClusterStatus::Active)
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClusterStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown cluster status '{}'", s))
    }
}

/// ClusterRecord is one entry of the fleet: capacity, ownership and status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub name: String,
    pub max_cpus: u32,
    pub memory_gb: u64,
    pub gpu_count: u32,
    /// Informational only, never used for matching
    pub gpu_description: String,
    pub jobs_in_queue: u32,
    pub owner: String,
    pub class: ClusterClass,
    pub status: ClusterStatus,
}

/// Descriptions accepted for a cluster without GPUs
pub const NO_GPU_DESCRIPTIONS: &[&str] = &["", "none", "no", "n/a"];

/// True when a GPU description denotes "no GPU"
pub fn denotes_no_gpu(description: &str) -> bool {
    let d = description.trim();
    NO_GPU_DESCRIPTIONS.iter().any(|n| d.eq_ignore_ascii_case(n))
}
