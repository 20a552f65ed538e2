use super::domain::{
    Alert, Application, Candidate, CandidateId, Job, JobId, NotificationRecord,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read access to candidate profiles plus the single write the engine is
/// allowed: the applied-jobs list.
pub trait CandidateRepository: Send + Sync {
    /// Active candidates with auto-apply enabled.
    fn auto_apply_pool(&self) -> Result<Vec<Candidate>, RepositoryError>;
    /// Active candidates opted into the talent radar.
    fn radar_pool(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn update(&self, candidate: &Candidate) -> Result<(), RepositoryError>;
}

/// Job postings, with the applicant-list write mirrored from applications.
pub trait JobRepository: Send + Sync {
    fn active(&self) -> Result<Vec<Job>, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn update(&self, job: &Job) -> Result<(), RepositoryError>;
}

/// Application store. `insert` must enforce uniqueness on
/// (candidate_id, job_id) and answer `Conflict` on a duplicate pair, because
/// the advisory `exists` check and the write are not atomic.
pub trait ApplicationRepository: Send + Sync {
    fn exists(&self, candidate_id: &CandidateId, job_id: &JobId)
        -> Result<bool, RepositoryError>;
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
}

/// Alert store. `save` persists the whole document once per scan and must
/// reject a match list carrying the same candidate twice.
pub trait AlertRepository: Send + Sync {
    fn active(&self) -> Result<Vec<Alert>, RepositoryError>;
    fn insert(&self, alert: Alert) -> Result<Alert, RepositoryError>;
    fn save(&self, alert: &Alert) -> Result<(), RepositoryError>;
}

/// Durable notification store backing the listing API.
pub trait NotificationRepository: Send + Sync {
    fn insert(&self, record: NotificationRecord) -> Result<NotificationRecord, RepositoryError>;
    fn for_recipient(&self, recipient_id: &str)
        -> Result<Vec<NotificationRecord>, RepositoryError>;
}
