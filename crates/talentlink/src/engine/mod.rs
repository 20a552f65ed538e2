//! Periodic matching and notification engine.
//!
//! Two recurring batch scans compare candidate profiles against job postings
//! (Auto-Apply) and against recruiter alerts (Talent Radar), record their
//! side effects exactly once, and fan notifications out to whoever is
//! connected. Scoring is pure and storage-free; every collaborator sits
//! behind a trait so the scans can be exercised against in-memory fakes.

pub mod auto_apply;
pub mod dedup;
pub mod dispatch;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod scoring;
pub mod talent_radar;

#[cfg(test)]
mod tests;

pub use auto_apply::{
    AutoApplyConfig, AutoApplyRunSummary, CandidateMatches, CreatedApplication, EngineError,
    MatchEngine,
};
pub use dedup::{already_matched, DedupGuard};
pub use dispatch::{
    ChannelId, DispatchError, NotificationDispatcher, PresenceRegistry, PushTransport,
};
pub use domain::{
    AccountStatus, Alert, AlertDraft, AlertId, AlertMatchRecord, AlertValidationError,
    Application, ApplicationId, ApplicationOrigin, ApplicationStatus, Candidate, CandidateId,
    EducationLevel, EducationRecord, Job, JobId, JobPreferences, JobStatus, JobType, MatchScore,
    NotificationId, NotificationKind, NotificationRecord, RecipientKind, RecruiterId, WorkMode,
};
pub use repository::{
    AlertRepository, ApplicationRepository, CandidateRepository, JobRepository,
    NotificationRepository, RepositoryError,
};
pub use router::{engine_router, EngineApi};
pub use scheduler::{
    AuditEntry, AuditSink, EngineKind, RunSummary, Scheduler, SchedulerError, TickOutcome,
    TickReport, TracingAuditSink,
};
pub use scoring::{experience_match, overall_score, skill_match, SkillMatch};
pub use talent_radar::{AlertEngine, TalentRadarRunSummary};
