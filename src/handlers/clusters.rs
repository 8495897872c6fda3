use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::matcher::rank_by_queue_depth;
use crate::models::*;
use crate::AppState;

use super::ApiError;

/// List every cluster regardless of status
pub async fn list_clusters(State(state): State<Arc<AppState>>) -> Json<Vec<ClusterView>> {
    let registry = state.registry.snapshot();
    Json(registry.list_all().iter().map(ClusterView::from).collect())
}

/// Filter clusters by resource constraints
pub async fn filter_clusters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
    payload: Result<Json<ConstraintsPayload>, JsonRejection>,
) -> Result<Json<Vec<ClusterView>>, ApiError> {
    let Json(payload) = payload?;
    let rank_by_queue = match query.rank.as_deref() {
        None | Some("") | Some("none") => false,
        Some("queue") => true,
        Some(other) => {
            return Err(ApiError::bad_request(format!(
                "unknown rank '{}': expected 'queue' or 'none'",
                other
            )))
        }
    };

    let registry = state.registry.snapshot();
    let request = ResourceRequest::try_from(payload)?;
    let result = state.matcher.match_request(&registry, &request)?;

    let clusters = if rank_by_queue {
        rank_by_queue_depth(result)
    } else {
        result.into_vec()
    };
    Ok(Json(clusters.into_iter().map(ClusterView::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub source: String,
    pub clusters: usize,
}

/// Reload the registry from the inventory source
pub async fn refresh_registry(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let clusters = state
        .registry
        .refresh(state.inventory.as_ref(), state.config.inventory_timeout())
        .await?;
    Ok(Json(RefreshResponse {
        source: state.inventory.name().to_string(),
        clusters,
    }))
}
