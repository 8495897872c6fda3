//! Optional prioritisation passes layered on top of a MatchResult.
//!
//! The matcher itself never reorders: its result is always in registry
//! declaration order. Callers that want a preference order apply one of
//! these explicitly.

use crate::models::ClusterRecord;

use super::MatchResult;

/// Shortest queue first; declaration order breaks ties
pub fn rank_by_queue_depth<'a>(result: MatchResult<'a>) -> Vec<&'a ClusterRecord> {
    let mut ranked = result.into_vec();
    // sort_by_key is stable
    ranked.sort_by_key(|c| c.jobs_in_queue);
    ranked
}
