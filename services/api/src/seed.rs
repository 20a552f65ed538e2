//! Deterministic demo marketplace used by the CLI demo and `serve --demo`.

use chrono::NaiveDate;
use talentlink::engine::{
    AccountStatus, Alert, AlertId, Candidate, CandidateId, EducationLevel, EducationRecord, Job,
    JobId, JobPreferences, JobStatus, JobType, RecruiterId, WorkMode,
};

use crate::infra::{
    InMemoryAlertRepository, InMemoryCandidateRepository, InMemoryJobRepository,
};

pub(crate) const DEMO_RECRUITER: &str = "rec-aurora";
pub(crate) const DEMO_RADAR_RECRUITER: &str = "rec-beacon";

fn candidate(
    id: &str,
    name: &str,
    skills: &[&str],
    experience_years: u8,
    city: &str,
) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        full_name: name.to_string(),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        experience_years,
        auto_apply_enabled: true,
        talent_radar_opt_in: true,
        status: AccountStatus::Active,
        resume_ref: Some(format!("s3://talentlink/resumes/{id}.pdf")),
        phone: Some("+1-515-555-0134".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1993, 6, 21),
        current_city: Some(city.to_string()),
        education: vec![EducationRecord {
            level: EducationLevel::TenthGrade,
            institution: "Lincoln High".to_string(),
            passing_year: Some(2009),
        }],
        preferences: JobPreferences {
            job_types: vec![JobType::FullTime],
            work_modes: vec![WorkMode::Remote, WorkMode::Hybrid],
        },
        avatar: Some(format!("s3://talentlink/avatars/{id}.png")),
        applied_jobs: Vec::new(),
    }
}

pub(crate) fn demo_candidates() -> Vec<Candidate> {
    let mut paused = candidate(
        "cand-dormant",
        "Dana Whitfield",
        &["React", "TypeScript"],
        6,
        "Chicago",
    );
    paused.auto_apply_enabled = false;
    paused.talent_radar_opt_in = false;

    vec![
        candidate(
            "cand-rivera",
            "Maya Rivera",
            &["React", "Node.js", "PostgreSQL"],
            5,
            "Des Moines",
        ),
        candidate(
            "cand-okafor",
            "Chidi Okafor",
            &["Rust", "Kubernetes", "PostgreSQL"],
            8,
            "Austin",
        ),
        candidate(
            "cand-junior",
            "Sam Patel",
            &["React"],
            1,
            "Des Moines",
        ),
        paused,
    ]
}

pub(crate) fn demo_jobs() -> Vec<Job> {
    vec![
        Job {
            id: JobId("job-frontend".to_string()),
            title: "Senior Frontend Engineer".to_string(),
            required_skills: vec!["React".to_string(), "Node.js".to_string()],
            minimum_experience: 4,
            status: JobStatus::Active,
            recruiter_id: RecruiterId(DEMO_RECRUITER.to_string()),
            applicants: Vec::new(),
        },
        Job {
            id: JobId("job-platform".to_string()),
            title: "Platform Engineer".to_string(),
            required_skills: vec!["Rust".to_string(), "Kubernetes".to_string()],
            minimum_experience: 5,
            status: JobStatus::Active,
            recruiter_id: RecruiterId(DEMO_RECRUITER.to_string()),
            applicants: Vec::new(),
        },
        Job {
            id: JobId("job-archived".to_string()),
            title: "Archived Listing".to_string(),
            required_skills: vec!["React".to_string()],
            minimum_experience: 0,
            status: JobStatus::Closed,
            recruiter_id: RecruiterId(DEMO_RECRUITER.to_string()),
            applicants: Vec::new(),
        },
    ]
}

pub(crate) fn demo_alerts() -> Vec<Alert> {
    vec![Alert {
        id: AlertId("alr-fullstack".to_string()),
        recruiter_id: RecruiterId(DEMO_RADAR_RECRUITER.to_string()),
        required_skills: vec!["React".to_string(), "PostgreSQL".to_string()],
        min_experience: 3,
        min_fit_score: 70,
        location: Some("des moines".to_string()),
        work_mode: Some(WorkMode::Remote),
        is_active: true,
        matches: Vec::new(),
    }]
}

pub(crate) fn seed(
    candidates: &InMemoryCandidateRepository,
    jobs: &InMemoryJobRepository,
    alerts: &InMemoryAlertRepository,
) {
    for candidate in demo_candidates() {
        candidates.seed(candidate);
    }
    for job in demo_jobs() {
        jobs.seed(job);
    }
    for alert in demo_alerts() {
        alerts.seed(alert);
    }
}
