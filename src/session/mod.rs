use chrono::Utc;
use uuid::Uuid;

use crate::error::BrokerError;
use crate::events::{BrokerEvent, EventSink};
use crate::matcher::Matcher;
use crate::models::{ResourceRequest, SessionInfo, SessionStartResponse};
use crate::registry::ClusterRegistry;

/// Record a user's accepted cluster selection.
///
/// The chosen cluster must exist and must still be eligible for the
/// submitted constraints. Nothing is provisioned here; the intake is handed
/// to downstream collaborators through a `SessionRequested` event.
pub fn start_session(
    registry: &ClusterRegistry,
    matcher: &Matcher,
    events: &dyn EventSink,
    info: SessionInfo,
) -> Result<SessionStartResponse, BrokerError> {
    if info.cluster.trim().is_empty() {
        return Err(BrokerError::invalid("cluster is required"));
    }
    if registry.get(&info.cluster).is_none() {
        return Err(BrokerError::UnknownCluster(info.cluster));
    }

    let request = ResourceRequest::try_from(info.constraints.clone())?;
    let eligible = matcher.match_request(registry, &request)?;
    if !eligible.contains(&info.cluster) {
        return Err(BrokerError::Ineligible(info.cluster));
    }

    let session_id = format!("session_{}", Uuid::new_v4().simple());
    events.emit(BrokerEvent::SessionRequested {
        session_id: session_id.clone(),
        cluster: info.cluster.clone(),
        research_item: info.research_item.clone(),
        cpu_count: request.cpu_count,
        memory: request.memory.clone(),
        gpu_count: request.gpu_count,
        wall_time_minutes: request.wall_time_minutes,
        dependencies: info.dependencies.enabled(),
        storage: info.storage.clone(),
        ide: info.ide.clone(),
    });

    Ok(SessionStartResponse {
        success: true,
        session_id,
        message: "Session started successfully".to_string(),
        timestamp: Utc::now(),
        session_info: info,
    })
}
