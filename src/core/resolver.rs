use std::collections::HashSet;

use crate::core::filters::matches_filter;
use crate::models::{Candidate, SwipeFilter, User};

/// Resolve the candidate pool for a requesting user.
///
/// # Pipeline stages
/// 1. Exclude the requester and everyone in their swipe history
/// 2. Apply the filter constraints (gender, age range, tag intersection)
/// 3. Deduplicate and order by ascending user id
///
/// The ordering is deterministic: the same (requester, filter, history)
/// triple yields the same sequence on repeated calls, which the swipe
/// session's cursor semantics depend on. An empty result is a valid,
/// non-error outcome.
pub fn resolve(
    requester_id: i32,
    pool: Vec<User>,
    swiped: &HashSet<i32>,
    filter: &SwipeFilter,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = pool
        .into_iter()
        // Stage 1: exclusion
        .filter(|user| user.id != requester_id && !swiped.contains(&user.id))
        // Stage 2: filter constraints
        .filter(|user| matches_filter(user, filter))
        .map(|user| user.to_candidate())
        .collect();

    // Stage 3: stable order, then drop duplicate ids from overlapping sources
    candidates.sort_by_key(|c| c.id);
    candidates.dedup_by_key(|c| c.id);

    candidates
}
