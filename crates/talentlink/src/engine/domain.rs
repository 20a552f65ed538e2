use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidate profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for recruiter accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecruiterId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for talent radar alerts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub String);

/// Identifier wrapper for notification records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

/// Account standing maintained by the profile-management service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
}

/// Lifecycle of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Active,
    Closed,
}

/// Pipeline stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Pending,
    Shortlist,
    Accept,
    Reject,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlist => "shortlist",
            ApplicationStatus::Accept => "accept",
            ApplicationStatus::Reject => "reject",
        }
    }
}

/// Distinguishes candidate-initiated applications from engine-created ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationOrigin {
    Manual,
    AutoApply,
}

impl ApplicationOrigin {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationOrigin::Manual => "manual",
            ApplicationOrigin::AutoApply => "auto_apply",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    TenthGrade,
    TwelfthGrade,
    Bachelor,
    Master,
    Doctorate,
}

/// Single education entry on a candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub level: EducationLevel,
    pub institution: String,
    pub passing_year: Option<u16>,
}

/// Job-type and work-mode preferences declared by the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobPreferences {
    pub job_types: Vec<JobType>,
    pub work_modes: Vec<WorkMode>,
}

/// Candidate profile as read from the profile-management service.
///
/// The engine never mutates profile fields other than `applied_jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub full_name: String,
    pub skills: Vec<String>,
    pub experience_years: u8,
    pub auto_apply_enabled: bool,
    pub talent_radar_opt_in: bool,
    pub status: AccountStatus,
    pub resume_ref: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub current_city: Option<String>,
    pub education: Vec<EducationRecord>,
    pub preferences: JobPreferences,
    pub avatar: Option<String>,
    pub applied_jobs: Vec<JobId>,
}

impl Candidate {
    /// Whether the profile carries everything Auto-Apply needs to submit on
    /// the candidate's behalf: resume, skills, contact and identity fields,
    /// a tenth-grade education record, preference lists, and an avatar.
    pub fn profile_complete(&self) -> bool {
        filled(&self.resume_ref)
            && !self.skills.is_empty()
            && filled(&self.phone)
            && self.date_of_birth.is_some()
            && filled(&self.current_city)
            && self
                .education
                .iter()
                .any(|record| record.level == EducationLevel::TenthGrade)
            && !self.preferences.job_types.is_empty()
            && !self.preferences.work_modes.is_empty()
            && filled(&self.avatar)
    }

    pub fn has_resume_and_skills(&self) -> bool {
        filled(&self.resume_ref) && !self.skills.is_empty()
    }
}

fn filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.trim().is_empty())
}

/// Job posting owned by a recruiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub required_skills: Vec<String>,
    pub minimum_experience: u8,
    pub status: JobStatus,
    pub recruiter_id: RecruiterId,
    pub applicants: Vec<CandidateId>,
}

/// Compatibility breakdown recorded on an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub overall: u8,
    pub skills: u8,
    pub experience: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// One application per (candidate, job) pair, whatever its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub score: MatchScore,
    pub origin: ApplicationOrigin,
    pub created_at: DateTime<Utc>,
}

/// Snapshot appended to an alert when a candidate clears its fit bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMatchRecord {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub skills: Vec<String>,
    pub experience_years: u8,
    pub resume_ref: Option<String>,
    pub fit_score: u8,
    pub matched_at: DateTime<Utc>,
}

/// Standing talent radar search owned by a recruiter.
///
/// `matches` is append-only; recorded matches are never re-scored or pruned,
/// and no two records may share a candidate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub recruiter_id: RecruiterId,
    pub required_skills: Vec<String>,
    pub min_experience: u8,
    pub min_fit_score: u8,
    pub location: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub is_active: bool,
    pub matches: Vec<AlertMatchRecord>,
}

impl Alert {
    pub fn has_match_for(&self, candidate_id: &CandidateId) -> bool {
        self.matches
            .iter()
            .any(|record| &record.candidate_id == candidate_id)
    }
}

/// Recruiter-supplied alert configuration, validated before an `Alert` exists.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertDraft {
    pub recruiter_id: RecruiterId,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub min_experience: u8,
    pub min_fit_score: u8,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
}

pub const MIN_FIT_SCORE_FLOOR: u8 = 30;
pub const MIN_FIT_SCORE_CEILING: u8 = 100;

impl AlertDraft {
    pub fn validate(&self) -> Result<(), AlertValidationError> {
        if self
            .required_skills
            .iter()
            .all(|skill| skill.trim().is_empty())
        {
            return Err(AlertValidationError::EmptyRequiredSkills);
        }
        if self.min_fit_score < MIN_FIT_SCORE_FLOOR || self.min_fit_score > MIN_FIT_SCORE_CEILING {
            return Err(AlertValidationError::FitScoreOutOfRange {
                value: self.min_fit_score,
            });
        }
        Ok(())
    }

    pub fn into_alert(self, id: AlertId) -> Alert {
        Alert {
            id,
            recruiter_id: self.recruiter_id,
            required_skills: self.required_skills,
            min_experience: self.min_experience,
            min_fit_score: self.min_fit_score,
            location: self.location,
            work_mode: self.work_mode,
            is_active: true,
            matches: Vec::new(),
        }
    }
}

/// Rejection raised at alert-creation time, before the engines ever see it.
#[derive(Debug, thiserror::Error)]
pub enum AlertValidationError {
    #[error("alert must list at least one required skill")]
    EmptyRequiredSkills,
    #[error("minimum fit score {value} outside the accepted 30..=100 range")]
    FitScoreOutOfRange { value: u8 },
}

/// Side of the marketplace a notification addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipientKind {
    Candidate,
    Recruiter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    AutoApplied,
    NewApplicant,
    RadarMatch,
}

/// Durable notification; `is_read` is owned by the notification-read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub recipient_id: String,
    pub recipient_kind: RecipientKind,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_job: Option<JobId>,
    pub related_application: Option<ApplicationId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

impl NotificationRecord {
    pub fn new(
        recipient_id: impl Into<String>,
        recipient_kind: RecipientKind,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: next_notification_id(),
            recipient_id: recipient_id.into(),
            recipient_kind,
            kind,
            title: title.into(),
            message: message.into(),
            related_job: None,
            related_application: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_job(mut self, job_id: JobId) -> Self {
        self.related_job = Some(job_id);
        self
    }

    pub fn with_application(mut self, application_id: ApplicationId) -> Self {
        self.related_application = Some(application_id);
        self
    }
}
