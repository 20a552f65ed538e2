use std::sync::Arc;

use clap::Args;
use talentlink::engine::{
    AlertEngine, AutoApplyConfig, AutoApplyRunSummary, EngineKind, MatchEngine,
    NotificationDispatcher, PresenceRegistry, TalentRadarRunSummary,
};
use talentlink::error::AppError;

use crate::infra::{
    InMemoryAlertRepository, InMemoryApplicationRepository, InMemoryCandidateRepository,
    InMemoryJobRepository, InMemoryNotificationRepository, LoggingPushTransport,
};
use crate::seed::{self, DEMO_RADAR_RECRUITER, DEMO_RECRUITER};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the auto-apply skill threshold for the demo run
    #[arg(long)]
    pub(crate) threshold: Option<u8>,
}

struct DemoWorld {
    applications: Arc<InMemoryApplicationRepository>,
    alerts: Arc<InMemoryAlertRepository>,
    notifications: Arc<InMemoryNotificationRepository>,
    match_engine: MatchEngine<
        InMemoryCandidateRepository,
        InMemoryJobRepository,
        InMemoryApplicationRepository,
    >,
    alert_engine: AlertEngine<InMemoryAlertRepository, InMemoryCandidateRepository>,
}

fn build_demo_world(skill_threshold: u8) -> DemoWorld {
    let candidates = Arc::new(InMemoryCandidateRepository::default());
    let jobs = Arc::new(InMemoryJobRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let alerts = Arc::new(InMemoryAlertRepository::default());
    let notifications = Arc::new(InMemoryNotificationRepository::default());
    seed::seed(&candidates, &jobs, &alerts);

    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        Arc::new(PresenceRegistry::new()),
        Arc::new(LoggingPushTransport),
    ));

    let match_engine = MatchEngine::new(
        candidates.clone(),
        jobs,
        applications.clone(),
        dispatcher.clone(),
        AutoApplyConfig { skill_threshold },
    );
    let alert_engine = AlertEngine::new(alerts.clone(), candidates, dispatcher);

    DemoWorld {
        applications,
        alerts,
        notifications,
        match_engine,
        alert_engine,
    }
}

pub(crate) fn run_engine_once(kind: EngineKind) -> Result<(), AppError> {
    let world = build_demo_world(AutoApplyConfig::default().skill_threshold);

    match kind {
        EngineKind::AutoApply => {
            let summary = world.match_engine.run().map_err(AppError::Engine)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).expect("summary serializes")
            );
        }
        EngineKind::TalentRadar => {
            let summary = world.alert_engine.run().map_err(AppError::Engine)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).expect("summary serializes")
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let threshold = args
        .threshold
        .unwrap_or(AutoApplyConfig::default().skill_threshold);
    let world = build_demo_world(threshold);

    println!("talentlink matching engine demo");
    println!("Auto-apply threshold: {threshold}%");

    let apply_summary = world.match_engine.run().map_err(AppError::Engine)?;
    render_auto_apply(&apply_summary);

    let radar_summary = world.alert_engine.run().map_err(AppError::Engine)?;
    render_talent_radar(&radar_summary, &world.alerts);

    render_notifications(&world.notifications);

    println!("\nApplications on record: {}", world.applications.all().len());

    Ok(())
}

fn render_auto_apply(summary: &AutoApplyRunSummary) {
    println!("\nAuto-Apply scan");
    println!(
        "- scanned {} candidates against {} jobs",
        summary.candidates_scanned, summary.jobs_scanned
    );
    println!("- created {} applications", summary.applications_created);
    for detail in &summary.matched_candidates {
        for created in &detail.applications {
            println!(
                "  - {} -> {} ({}% skills)",
                detail.candidate_id.0, created.job_id.0, created.score.skills
            );
        }
    }
}

fn render_talent_radar(summary: &TalentRadarRunSummary, alerts: &InMemoryAlertRepository) {
    println!("\nTalent Radar scan");
    println!(
        "- scanned {} alerts against {} candidates",
        summary.alerts_scanned, summary.candidates_scanned
    );
    println!("- recorded {} matches", summary.matches_recorded);
    for alert in seed::demo_alerts() {
        if let Some(stored) = alerts.get(&alert.id) {
            for record in &stored.matches {
                println!(
                    "  - {}: {} at {}% fit",
                    stored.id.0, record.candidate_name, record.fit_score
                );
            }
        }
    }
}

fn render_notifications(notifications: &InMemoryNotificationRepository) {
    println!("\nNotification inboxes (nobody connected, so all offline-durable)");
    for recipient in [DEMO_RECRUITER, DEMO_RADAR_RECRUITER] {
        let inbox: Vec<_> = notifications
            .all()
            .into_iter()
            .filter(|record| record.recipient_id == recipient)
            .collect();
        println!("- {recipient}: {} notifications", inbox.len());
        for record in inbox {
            println!("  - {}: {}", record.title, record.message);
        }
    }
}
