use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use super::auto_apply::EngineError;
use super::dedup::already_matched;
use super::dispatch::NotificationDispatcher;
use super::domain::{
    Alert, AlertMatchRecord, Candidate, NotificationKind, NotificationRecord, RecipientKind,
};
use super::repository::{AlertRepository, CandidateRepository};
use super::scoring::{experience_match, overall_score, skill_match};

/// Width of the experience window an alert scores against, above its minimum.
const EXPERIENCE_WINDOW_YEARS: u8 = 10;

/// Outcome of a full Talent Radar scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalentRadarRunSummary {
    pub alerts_scanned: usize,
    pub candidates_scanned: usize,
    pub matches_recorded: usize,
}

/// Talent Radar batch scan: every active alert against every opted-in
/// candidate. Each alert document is saved once per scan, after its
/// candidate loop, so a crash mid-scan loses only that alert's new records.
pub struct AlertEngine<L, C> {
    alerts: Arc<L>,
    candidates: Arc<C>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl<L, C> AlertEngine<L, C>
where
    L: AlertRepository,
    C: CandidateRepository,
{
    pub fn new(alerts: Arc<L>, candidates: Arc<C>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self {
            alerts,
            candidates,
            dispatcher,
        }
    }

    pub fn run(&self) -> Result<TalentRadarRunSummary, EngineError> {
        let alerts = self.alerts.active()?;
        let pool: Vec<Candidate> = self
            .candidates
            .radar_pool()?
            .into_iter()
            .filter(|candidate| candidate.has_resume_and_skills())
            .collect();

        let mut summary = TalentRadarRunSummary {
            alerts_scanned: alerts.len(),
            candidates_scanned: pool.len(),
            matches_recorded: 0,
        };

        for mut alert in alerts {
            let mut appended = 0;
            for candidate in &pool {
                if let Some(record) = self.evaluate_pair(&alert, candidate) {
                    self.notify(&alert, &record);
                    alert.matches.push(record);
                    appended += 1;
                }
            }

            if appended == 0 {
                continue;
            }
            match self.alerts.save(&alert) {
                Ok(()) => summary.matches_recorded += appended,
                Err(err) => {
                    warn!(alert = %alert.id.0, %err, "alert save failed, matches lost for this scan");
                }
            }
        }

        Ok(summary)
    }

    fn evaluate_pair(&self, alert: &Alert, candidate: &Candidate) -> Option<AlertMatchRecord> {
        if already_matched(alert, &candidate.id) {
            return None;
        }
        if candidate.experience_years < alert.min_experience {
            return None;
        }
        if let Some(location) = &alert.location {
            let city = candidate.current_city.as_deref().unwrap_or("");
            if !city.to_lowercase().contains(&location.to_lowercase()) {
                return None;
            }
        }
        if let Some(mode) = &alert.work_mode {
            if !candidate.preferences.work_modes.contains(mode) {
                return None;
            }
        }

        let skills = skill_match(&candidate.skills, &alert.required_skills);
        let experience = experience_match(
            candidate.experience_years,
            alert.min_experience,
            alert.min_experience.saturating_add(EXPERIENCE_WINDOW_YEARS),
        );
        let fit_score = overall_score(skills.percentage, experience);
        if fit_score < alert.min_fit_score {
            return None;
        }

        Some(AlertMatchRecord {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.full_name.clone(),
            skills: candidate.skills.clone(),
            experience_years: candidate.experience_years,
            resume_ref: candidate.resume_ref.clone(),
            fit_score,
            matched_at: Utc::now(),
        })
    }

    fn notify(&self, alert: &Alert, record: &AlertMatchRecord) {
        let notification = NotificationRecord::new(
            alert.recruiter_id.0.clone(),
            RecipientKind::Recruiter,
            NotificationKind::RadarMatch,
            "Talent radar match",
            format!(
                "{} matches your talent radar at {}% fit",
                record.candidate_name, record.fit_score
            ),
        );

        if let Err(err) = self.dispatcher.send(notification) {
            warn!(
                alert = %alert.id.0,
                candidate = %record.candidate_id.0,
                %err,
                "notification not persisted"
            );
        }
    }
}
