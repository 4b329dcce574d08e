//! Single in-flight analysis gate.
//!
//! Each session may have at most one analysis running. A second submission
//! while the first is outstanding is rejected, not queued. The permit is
//! released when [`SubmissionPermit`] is dropped, which covers success, every
//! error path, and the caller abandoning the future.

use crate::error::AnalysisError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

type ActiveSessions = Arc<Mutex<HashSet<String>>>;

/// Hands out one permit per session.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    active: ActiveSessions,
}

fn lock(active: &ActiveSessions) -> MutexGuard<'_, HashSet<String>> {
    // The set is only ever inserted into or removed from, so a poisoned lock
    // still holds a consistent value.
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the permit for `session`, or fails if it is already taken.
    pub fn try_acquire(&self, session: &str) -> Result<SubmissionPermit, AnalysisError> {
        if !lock(&self.active).insert(session.to_string()) {
            return Err(AnalysisError::AnalysisInProgress(session.to_string()));
        }
        debug!(session, "Submission permit acquired");
        Ok(SubmissionPermit {
            session: session.to_string(),
            active: self.active.clone(),
        })
    }

    /// Whether `session` currently holds a permit.
    pub fn is_busy(&self, session: &str) -> bool {
        lock(&self.active).contains(session)
    }
}

/// Proof that a session's analysis is in flight. Releases on drop.
#[derive(Debug)]
pub struct SubmissionPermit {
    session: String,
    active: ActiveSessions,
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.session);
        debug!(session = %self.session, "Submission permit released");
    }
}
