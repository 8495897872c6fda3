use crate::error::BrokerError;
use crate::models::MemoryPolicy;

/// Parse a memory quantity such as "128 GB" into whole gigabytes.
///
/// Only the leading whitespace-separated token is read and it must be a
/// non-negative integer; any unit after it is ignored. A missing or blank
/// quantity is resolved by `policy`.
pub fn parse_memory_gb(raw: Option<&str>, policy: MemoryPolicy) -> Result<u64, BrokerError> {
    let token = raw.and_then(|s| s.split_whitespace().next());

    match token {
        None => match policy {
            MemoryPolicy::NoConstraint => Ok(0),
            MemoryPolicy::Reject => Err(BrokerError::invalid("memory quantity is required")),
        },
        Some(token) => token.parse::<u64>().map_err(|_| {
            BrokerError::invalid(format!(
                "memory quantity '{}' must start with a whole number of GB",
                raw.unwrap_or_default()
            ))
        }),
    }
}
