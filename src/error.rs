/// Failures surfaced by the registry, matcher and session intake.
///
/// `InvalidRequest` is always a caller error and is never retried.
/// `RegistryUnavailable` only occurs when a snapshot is fetched from an
/// inventory source; callers may retry it with backoff.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("cluster not found: {0}")]
    UnknownCluster(String),

    #[error("cluster {0} does not satisfy the requested constraints")]
    Ineligible(String),
}

impl BrokerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::RegistryUnavailable(msg.into())
    }
}
