use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::engine::auto_apply::{AutoApplyConfig, MatchEngine};
use crate::engine::dispatch::{
    ChannelId, DispatchError, NotificationDispatcher, PresenceRegistry, PushTransport,
};
use crate::engine::domain::{
    AccountStatus, Alert, AlertId, Application, Candidate, CandidateId, EducationLevel,
    EducationRecord, Job, JobId, JobPreferences, JobStatus, JobType, NotificationRecord,
    RecruiterId, WorkMode,
};
use crate::engine::repository::{
    AlertRepository, ApplicationRepository, CandidateRepository, JobRepository,
    NotificationRepository, RepositoryError,
};
use crate::engine::scheduler::{AuditEntry, AuditSink};
use crate::engine::talent_radar::AlertEngine;

pub(super) fn complete_candidate(id: &str, skills: &[&str], experience_years: u8) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        full_name: format!("Candidate {id}"),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        experience_years,
        auto_apply_enabled: true,
        talent_radar_opt_in: true,
        status: AccountStatus::Active,
        resume_ref: Some(format!("s3://talentlink/resumes/{id}.pdf")),
        phone: Some("+1-515-555-0100".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 4, 12),
        current_city: Some("Des Moines".to_string()),
        education: vec![EducationRecord {
            level: EducationLevel::TenthGrade,
            institution: "Central High".to_string(),
            passing_year: Some(2011),
        }],
        preferences: JobPreferences {
            job_types: vec![JobType::FullTime],
            work_modes: vec![WorkMode::Remote],
        },
        avatar: Some(format!("s3://talentlink/avatars/{id}.png")),
        applied_jobs: Vec::new(),
    }
}

pub(super) fn job(id: &str, required: &[&str], minimum_experience: u8) -> Job {
    Job {
        id: JobId(id.to_string()),
        title: format!("Role {id}"),
        required_skills: required.iter().map(|skill| skill.to_string()).collect(),
        minimum_experience,
        status: JobStatus::Active,
        recruiter_id: RecruiterId("rec-1".to_string()),
        applicants: Vec::new(),
    }
}

pub(super) fn alert(id: &str, required: &[&str], min_experience: u8, min_fit_score: u8) -> Alert {
    Alert {
        id: AlertId(id.to_string()),
        recruiter_id: RecruiterId("rec-1".to_string()),
        required_skills: required.iter().map(|skill| skill.to_string()).collect(),
        min_experience,
        min_fit_score,
        location: None,
        work_mode: None,
        is_active: true,
        matches: Vec::new(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCandidates {
    records: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
}

impl MemoryCandidates {
    pub(super) fn seed(&self, candidate: Candidate) {
        let mut guard = self.records.lock().expect("candidate mutex poisoned");
        guard.insert(candidate.id.clone(), candidate);
    }

    pub(super) fn get(&self, id: &CandidateId) -> Option<Candidate> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        guard.get(id).cloned()
    }
}

impl CandidateRepository for MemoryCandidates {
    fn auto_apply_pool(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        Ok(guard
            .values()
            .filter(|candidate| {
                candidate.auto_apply_enabled && candidate.status == AccountStatus::Active
            })
            .cloned()
            .collect())
    }

    fn radar_pool(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        Ok(guard
            .values()
            .filter(|candidate| {
                candidate.talent_radar_opt_in && candidate.status == AccountStatus::Active
            })
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, candidate: &Candidate) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("candidate mutex poisoned");
        if !guard.contains_key(&candidate.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(candidate.id.clone(), candidate.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryJobs {
    records: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl MemoryJobs {
    pub(super) fn seed(&self, job: Job) {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        guard.insert(job.id.clone(), job);
    }

    pub(super) fn get(&self, id: &JobId) -> Option<Job> {
        let guard = self.records.lock().expect("job mutex poisoned");
        guard.get(id).cloned()
    }
}

impl JobRepository for MemoryJobs {
    fn active(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| job.status == JobStatus::Active)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        if !guard.contains_key(&job.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    records: Arc<Mutex<Vec<Application>>>,
}

impl MemoryApplications {
    pub(super) fn all(&self) -> Vec<Application> {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .clone()
    }
}

impl ApplicationRepository for MemoryApplications {
    fn exists(
        &self,
        candidate_id: &CandidateId,
        job_id: &JobId,
    ) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .iter()
            .any(|record| &record.candidate_id == candidate_id && &record.job_id == job_id))
    }

    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.iter().any(|record| {
            record.candidate_id == application.candidate_id && record.job_id == application.job_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(application.clone());
        Ok(application)
    }
}

/// Application store whose writes always fail, for partial-failure scans.
pub(super) struct FailingApplications;

impl ApplicationRepository for FailingApplications {
    fn exists(&self, _: &CandidateId, _: &JobId) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    fn insert(&self, _: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("write timeout".to_string()))
    }
}

/// Candidate store that is entirely offline, for run-level aborts.
pub(super) struct UnavailableCandidates;

impl CandidateRepository for UnavailableCandidates {
    fn auto_apply_pool(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn radar_pool(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _: &Candidate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    records: Arc<Mutex<HashMap<AlertId, Alert>>>,
    save_calls: Arc<Mutex<usize>>,
}

impl MemoryAlerts {
    pub(super) fn seed(&self, alert: Alert) {
        let mut guard = self.records.lock().expect("alert mutex poisoned");
        guard.insert(alert.id.clone(), alert);
    }

    pub(super) fn get(&self, id: &AlertId) -> Option<Alert> {
        let guard = self.records.lock().expect("alert mutex poisoned");
        guard.get(id).cloned()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.save_calls.lock().expect("save counter poisoned")
    }
}

impl AlertRepository for MemoryAlerts {
    fn active(&self) -> Result<Vec<Alert>, RepositoryError> {
        let guard = self.records.lock().expect("alert mutex poisoned");
        Ok(guard
            .values()
            .filter(|alert| alert.is_active)
            .cloned()
            .collect())
    }

    fn insert(&self, alert: Alert) -> Result<Alert, RepositoryError> {
        let mut guard = self.records.lock().expect("alert mutex poisoned");
        if guard.contains_key(&alert.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(alert.id.clone(), alert.clone());
        Ok(alert)
    }

    fn save(&self, alert: &Alert) -> Result<(), RepositoryError> {
        let mut seen = std::collections::HashSet::new();
        for record in &alert.matches {
            if !seen.insert(record.candidate_id.clone()) {
                return Err(RepositoryError::Conflict);
            }
        }

        let mut guard = self.records.lock().expect("alert mutex poisoned");
        if !guard.contains_key(&alert.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(alert.id.clone(), alert.clone());
        *self.save_calls.lock().expect("save counter poisoned") += 1;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
}

impl MemoryNotifications {
    pub(super) fn all(&self) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationRepository for MemoryNotifications {
    fn insert(&self, record: NotificationRecord) -> Result<NotificationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn for_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<NotificationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("notification mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.recipient_id == recipient_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingTransport {
    pushes: Arc<Mutex<Vec<(ChannelId, serde_json::Value)>>>,
}

impl RecordingTransport {
    pub(super) fn pushes(&self) -> Vec<(ChannelId, serde_json::Value)> {
        self.pushes.lock().expect("push mutex poisoned").clone()
    }
}

impl PushTransport for RecordingTransport {
    fn push(&self, channel: &ChannelId, payload: serde_json::Value) -> Result<(), DispatchError> {
        self.pushes
            .lock()
            .expect("push mutex poisoned")
            .push((channel.clone(), payload));
        Ok(())
    }
}

pub(super) struct FailingTransport;

impl PushTransport for FailingTransport {
    fn push(&self, _: &ChannelId, _: serde_json::Value) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("socket closed".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, entry: AuditEntry) {
        self.entries.lock().expect("audit mutex poisoned").push(entry);
    }
}

pub(super) struct AutoApplyHarness {
    pub(super) candidates: Arc<MemoryCandidates>,
    pub(super) jobs: Arc<MemoryJobs>,
    pub(super) applications: Arc<MemoryApplications>,
    pub(super) notifications: Arc<MemoryNotifications>,
    pub(super) presence: Arc<PresenceRegistry>,
    pub(super) transport: Arc<RecordingTransport>,
    pub(super) engine: MatchEngine<MemoryCandidates, MemoryJobs, MemoryApplications>,
}

pub(super) fn build_match_engine(skill_threshold: u8) -> AutoApplyHarness {
    let candidates = Arc::new(MemoryCandidates::default());
    let jobs = Arc::new(MemoryJobs::default());
    let applications = Arc::new(MemoryApplications::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let presence = Arc::new(PresenceRegistry::new());
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        presence.clone(),
        transport.clone(),
    ));
    let engine = MatchEngine::new(
        candidates.clone(),
        jobs.clone(),
        applications.clone(),
        dispatcher,
        AutoApplyConfig { skill_threshold },
    );

    AutoApplyHarness {
        candidates,
        jobs,
        applications,
        notifications,
        presence,
        transport,
        engine,
    }
}

pub(super) struct RadarHarness {
    pub(super) alerts: Arc<MemoryAlerts>,
    pub(super) candidates: Arc<MemoryCandidates>,
    pub(super) notifications: Arc<MemoryNotifications>,
    pub(super) presence: Arc<PresenceRegistry>,
    pub(super) transport: Arc<RecordingTransport>,
    pub(super) engine: AlertEngine<MemoryAlerts, MemoryCandidates>,
}

pub(super) fn build_alert_engine() -> RadarHarness {
    let alerts = Arc::new(MemoryAlerts::default());
    let candidates = Arc::new(MemoryCandidates::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let presence = Arc::new(PresenceRegistry::new());
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        presence.clone(),
        transport.clone(),
    ));
    let engine = AlertEngine::new(alerts.clone(), candidates.clone(), dispatcher);

    RadarHarness {
        alerts,
        candidates,
        notifications,
        presence,
        transport,
        engine,
    }
}
