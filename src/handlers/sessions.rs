use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::*;
use crate::session;
use crate::AppState;

use super::{created, ApiError};

/// Accept a cluster selection and open a session request
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    info: Result<Json<SessionInfo>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionStartResponse>), ApiError> {
    let Json(info) = info?;
    let registry = state.registry.snapshot();
    let resp = session::start_session(&registry, &state.matcher, state.events.as_ref(), info)?;
    Ok(created(resp))
}
