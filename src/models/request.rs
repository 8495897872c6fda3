use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ResourceRequest is the caller's constraint set for one match call.
/// Integers are signed so that negative input can be rejected instead of
/// failing to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub cpu_count: i64,
    /// Human-supplied quantity such as "128 GB"
    pub memory: Option<String>,
    pub gpu_count: i64,
    /// Advisory; kept for scheduler integration, never used for filtering
    pub wall_time_minutes: i64,
}

impl ResourceRequest {
    pub fn new(cpu_count: i64, memory: impl Into<String>, gpu_count: i64) -> Self {
        Self {
            cpu_count,
            memory: Some(memory.into()),
            gpu_count,
            wall_time_minutes: 0,
        }
    }

    pub fn with_wall_time(mut self, minutes: i64) -> Self {
        self.wall_time_minutes = minutes;
        self
    }
}

/// Normalised, non-negative constraints derived from a ResourceRequest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    pub cpus: u64,
    pub memory_gb: u64,
    /// 0 means no GPU constraint at all
    pub gpus: u64,
}

/// What a missing or blank memory quantity means
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemoryPolicy {
    /// Missing memory is an InvalidRequest
    #[default]
    Reject,
    /// Missing memory imposes no memory constraint (0 GB)
    NoConstraint,
}

impl MemoryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryPolicy::Reject => "reject",
            MemoryPolicy::NoConstraint => "no-constraint",
        }
    }
}

impl fmt::Display for MemoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(MemoryPolicy::Reject),
            "no-constraint" | "no_constraint" | "none" => Ok(MemoryPolicy::NoConstraint),
            other => Err(format!("unknown memory policy '{}'", other)),
        }
    }
}
