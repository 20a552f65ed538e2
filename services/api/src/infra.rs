use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use talentlink::engine::{
    AccountStatus, Alert, AlertId, AlertRepository, Application, ApplicationRepository,
    Candidate, CandidateId, CandidateRepository, ChannelId, DispatchError, Job, JobId,
    JobRepository, JobStatus, NotificationRecord, NotificationRepository, PushTransport,
    RepositoryError,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    records: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
}

impl InMemoryCandidateRepository {
    pub(crate) fn seed(&self, candidate: Candidate) {
        let mut guard = self.records.lock().expect("candidate mutex poisoned");
        guard.insert(candidate.id.clone(), candidate);
    }
}

impl CandidateRepository for InMemoryCandidateRepository {
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
pub(crate) struct InMemoryJobRepository {
    records: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    pub(crate) fn seed(&self, job: Job) {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        guard.insert(job.id.clone(), job);
    }
}

impl JobRepository for InMemoryJobRepository {
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
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<Vec<Application>>>,
}

impl InMemoryApplicationRepository {
    pub(crate) fn all(&self) -> Vec<Application> {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .clone()
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertRepository {
    records: Arc<Mutex<HashMap<AlertId, Alert>>>,
}

impl InMemoryAlertRepository {
    pub(crate) fn seed(&self, alert: Alert) {
        let mut guard = self.records.lock().expect("alert mutex poisoned");
        guard.insert(alert.id.clone(), alert);
    }

    pub(crate) fn get(&self, id: &AlertId) -> Option<Alert> {
        let guard = self.records.lock().expect("alert mutex poisoned");
        guard.get(id).cloned()
    }
}

impl AlertRepository for InMemoryAlertRepository {
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
        let mut seen = HashSet::new();
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
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationRepository {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
}

impl InMemoryNotificationRepository {
    pub(crate) fn all(&self) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationRepository for InMemoryNotificationRepository {
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

/// Stand-in for the WebSocket layer: pushes land in the service log.
#[derive(Default, Clone)]
pub(crate) struct LoggingPushTransport;

impl PushTransport for LoggingPushTransport {
    fn push(&self, channel: &ChannelId, payload: serde_json::Value) -> Result<(), DispatchError> {
        info!(channel = %channel.0, %payload, "push delivered");
        Ok(())
    }
}
