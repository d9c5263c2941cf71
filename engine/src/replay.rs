//! Batch replay of historical attempts.
//!
//! Profiles are only correct when each user's attempts are applied in
//! timestamp order. [`replay_attempts`] sorts the batch first, then runs every
//! user's attempts sequentially while different users proceed concurrently.

use crate::detector::{AnalysisOutcome, RiskDetector};
use crate::error::{Result, RiskError};
use crate::providers::{AssessmentSink, GeoResolver, ProfileStore};
use crate::state::{LoginAttempt, UserId};
use futures::future::try_join_all;
use std::collections::HashMap;

/// Sort attempts by timestamp, keeping input order for equal timestamps.
#[must_use]
pub fn sort_chronologically(mut attempts: Vec<LoginAttempt>) -> Vec<LoginAttempt> {
    attempts.sort_by_key(|attempt| attempt.timestamp);
    attempts
}

/// Replay a batch through the detector.
///
/// Returns one outcome per attempt, in chronological order.
///
/// # Errors
///
/// Returns the first load error hit by any user. Other users' analyses that
/// already completed have still been saved.
pub async fn replay_attempts<G, S, K>(
    detector: &RiskDetector<G, S, K>,
    attempts: Vec<LoginAttempt>,
) -> Result<Vec<AnalysisOutcome>>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    let attempts = sort_chronologically(attempts);
    let total = attempts.len();

    let mut per_user: HashMap<UserId, Vec<(usize, LoginAttempt)>> = HashMap::new();
    for (index, attempt) in attempts.into_iter().enumerate() {
        per_user
            .entry(attempt.user_id.clone())
            .or_default()
            .push((index, attempt));
    }

    tracing::info!(attempts = total, users = per_user.len(), "Replaying attempts");

    let users = per_user.into_values().map(|queue| async move {
        let mut outcomes = Vec::with_capacity(queue.len());
        for (index, attempt) in queue {
            outcomes.push((index, detector.analyze(&attempt).await?));
        }
        Ok::<_, RiskError>(outcomes)
    });

    let mut slots: Vec<Option<AnalysisOutcome>> = vec![None; total];
    for (index, outcome) in try_join_all(users).await?.into_iter().flatten() {
        slots[index] = Some(outcome);
    }

    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| RiskError::Internal("replay slot left empty".to_string())))
        .collect()
}
