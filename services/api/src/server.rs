use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAlertRepository, InMemoryApplicationRepository,
    InMemoryCandidateRepository, InMemoryJobRepository, InMemoryNotificationRepository,
    LoggingPushTransport,
};
use crate::routes::service_router;
use crate::seed;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentlink::config::AppConfig;
use talentlink::engine::{
    AlertEngine, AutoApplyConfig, EngineApi, EngineKind, MatchEngine, NotificationDispatcher,
    PresenceRegistry, RunSummary, Scheduler, TracingAuditSink,
};
use talentlink::error::AppError;
use talentlink::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let candidates = Arc::new(InMemoryCandidateRepository::default());
    let jobs = Arc::new(InMemoryJobRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let alerts = Arc::new(InMemoryAlertRepository::default());
    let notifications = Arc::new(InMemoryNotificationRepository::default());
    if args.demo {
        seed::seed(&candidates, &jobs, &alerts);
        info!("demo marketplace seeded");
    }

    let presence = Arc::new(PresenceRegistry::new());
    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        presence,
        Arc::new(LoggingPushTransport),
    ));

    let match_engine = Arc::new(MatchEngine::new(
        candidates.clone(),
        jobs,
        applications,
        dispatcher.clone(),
        AutoApplyConfig {
            skill_threshold: config.engine.auto_apply_threshold,
        },
    ));
    let alert_engine = Arc::new(AlertEngine::new(alerts.clone(), candidates, dispatcher));

    let mut scheduler = Scheduler::new(Arc::new(TracingAuditSink));
    {
        let engine = match_engine.clone();
        scheduler.register(
            EngineKind::AutoApply,
            config.engine.auto_apply_interval(),
            move || engine.run().map(RunSummary::AutoApply),
        );
    }
    {
        let engine = alert_engine.clone();
        scheduler.register(
            EngineKind::TalentRadar,
            config.engine.talent_radar_interval(),
            move || engine.run().map(RunSummary::TalentRadar),
        );
    }
    let scheduler = Arc::new(scheduler);
    let _tick_loops = scheduler.clone().spawn();

    let engine_api = Arc::new(EngineApi::new(scheduler, notifications, alerts));

    let app = service_router(engine_api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "matching engine service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
