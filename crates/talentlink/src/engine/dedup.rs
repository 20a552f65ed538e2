use std::sync::Arc;

use super::domain::{Alert, CandidateId, JobId};
use super::repository::{ApplicationRepository, RepositoryError};

/// Idempotency checks run before any matching write.
///
/// Both checks are advisory; the storage layer's uniqueness constraints are
/// the backstop when a concurrent run races the check-then-write window.
pub struct DedupGuard<A> {
    applications: Arc<A>,
}

impl<A> DedupGuard<A>
where
    A: ApplicationRepository,
{
    pub fn new(applications: Arc<A>) -> Self {
        Self { applications }
    }

    pub fn already_applied(
        &self,
        candidate_id: &CandidateId,
        job_id: &JobId,
    ) -> Result<bool, RepositoryError> {
        self.applications.exists(candidate_id, job_id)
    }
}

/// Membership check against the alert's recorded matches.
pub fn already_matched(alert: &Alert, candidate_id: &CandidateId) -> bool {
    alert.has_match_for(candidate_id)
}
