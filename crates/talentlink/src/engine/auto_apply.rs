use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use super::dedup::DedupGuard;
use super::dispatch::NotificationDispatcher;
use super::domain::{
    Application, ApplicationId, ApplicationOrigin, ApplicationStatus, Candidate, CandidateId,
    Job, JobId, MatchScore, NotificationKind, NotificationRecord, RecipientKind,
};
use super::repository::{
    ApplicationRepository, CandidateRepository, JobRepository, RepositoryError,
};
use super::scoring::skill_match;

/// Run-level failure. Pair-level problems are logged and skipped; this only
/// surfaces when the scan cannot load its inputs or has to give up entirely.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Tuning for the Auto-Apply scan.
#[derive(Debug, Clone)]
pub struct AutoApplyConfig {
    /// Minimum skill-match percentage before an application is submitted.
    pub skill_threshold: u8,
}

impl Default for AutoApplyConfig {
    fn default() -> Self {
        Self { skill_threshold: 80 }
    }
}

/// One application created during a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedApplication {
    pub job_id: JobId,
    pub application_id: ApplicationId,
    pub score: MatchScore,
}

/// Per-candidate detail, present only for candidates that gained at least
/// one application this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMatches {
    pub candidate_id: CandidateId,
    pub applications: Vec<CreatedApplication>,
}

/// Outcome of a full Auto-Apply scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoApplyRunSummary {
    pub candidates_scanned: usize,
    pub jobs_scanned: usize,
    pub applications_created: usize,
    pub matched_candidates: Vec<CandidateMatches>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Auto-Apply batch scan: every eligible candidate against every active job.
///
/// The scan is exhaustive and unbounded; large catalogs would need batching
/// before this runs against production volumes.
pub struct MatchEngine<C, J, A> {
    candidates: Arc<C>,
    jobs: Arc<J>,
    applications: Arc<A>,
    dedup: DedupGuard<A>,
    dispatcher: Arc<NotificationDispatcher>,
    config: AutoApplyConfig,
}

impl<C, J, A> MatchEngine<C, J, A>
where
    C: CandidateRepository,
    J: JobRepository,
    A: ApplicationRepository,
{
    pub fn new(
        candidates: Arc<C>,
        jobs: Arc<J>,
        applications: Arc<A>,
        dispatcher: Arc<NotificationDispatcher>,
        config: AutoApplyConfig,
    ) -> Self {
        let dedup = DedupGuard::new(applications.clone());
        Self {
            candidates,
            jobs,
            applications,
            dedup,
            dispatcher,
            config,
        }
    }

    pub fn run(&self) -> Result<AutoApplyRunSummary, EngineError> {
        let pool = self.candidates.auto_apply_pool()?;
        let mut jobs = self.jobs.active()?;
        let mut eligible: Vec<Candidate> = pool
            .into_iter()
            .filter(|candidate| candidate.profile_complete())
            .collect();

        let mut summary = AutoApplyRunSummary {
            candidates_scanned: eligible.len(),
            jobs_scanned: jobs.len(),
            applications_created: 0,
            matched_candidates: Vec::new(),
        };

        for candidate in eligible.iter_mut() {
            let mut created = Vec::new();
            for job in jobs.iter_mut() {
                match self.evaluate_pair(candidate, job) {
                    Ok(Some(application)) => created.push(application),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(
                            candidate = %candidate.id.0,
                            job = %job.id.0,
                            %err,
                            "pair abandoned, scan continues"
                        );
                    }
                }
            }
            if !created.is_empty() {
                summary.applications_created += created.len();
                summary.matched_candidates.push(CandidateMatches {
                    candidate_id: candidate.id.clone(),
                    applications: created,
                });
            }
        }

        Ok(summary)
    }

    fn evaluate_pair(
        &self,
        candidate: &mut Candidate,
        job: &mut Job,
    ) -> Result<Option<CreatedApplication>, RepositoryError> {
        if self.dedup.already_applied(&candidate.id, &job.id)? {
            return Ok(None);
        }

        // Hard gate: below the posting's minimum the pair is never scored.
        if candidate.experience_years < job.minimum_experience {
            return Ok(None);
        }

        let skills = skill_match(&candidate.skills, &job.required_skills);
        if skills.percentage < self.config.skill_threshold {
            return Ok(None);
        }

        let application = Application {
            id: next_application_id(),
            candidate_id: candidate.id.clone(),
            job_id: job.id.clone(),
            status: ApplicationStatus::Applied,
            score: MatchScore {
                overall: skills.percentage,
                skills: skills.percentage,
                // The hard gate already passed, so experience is full credit.
                experience: 100,
                matched_skills: skills.matched,
                missing_skills: skills.missing,
            },
            origin: ApplicationOrigin::AutoApply,
            created_at: Utc::now(),
        };

        let stored = match self.applications.insert(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                debug!(
                    candidate = %candidate.id.0,
                    job = %job.id.0,
                    "duplicate pair rejected by store"
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        candidate.applied_jobs.push(job.id.clone());
        self.candidates.update(candidate)?;
        job.applicants.push(candidate.id.clone());
        self.jobs.update(job)?;

        self.notify(candidate, job, &stored);

        Ok(Some(CreatedApplication {
            job_id: job.id.clone(),
            application_id: stored.id.clone(),
            score: stored.score,
        }))
    }

    fn notify(&self, candidate: &Candidate, job: &Job, application: &Application) {
        let recruiter = NotificationRecord::new(
            job.recruiter_id.0.clone(),
            RecipientKind::Recruiter,
            NotificationKind::NewApplicant,
            "New auto-applied candidate",
            format!("{} auto-applied to {}", candidate.full_name, job.title),
        )
        .with_job(job.id.clone())
        .with_application(application.id.clone());

        let applicant = NotificationRecord::new(
            candidate.id.0.clone(),
            RecipientKind::Candidate,
            NotificationKind::AutoApplied,
            "Auto-applied successfully",
            format!("Your profile was automatically submitted to {}", job.title),
        )
        .with_job(job.id.clone())
        .with_application(application.id.clone());

        for record in [recruiter, applicant] {
            if let Err(err) = self.dispatcher.send(record) {
                warn!(
                    candidate = %candidate.id.0,
                    job = %job.id.0,
                    %err,
                    "notification not persisted"
                );
            }
        }
    }
}
