use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AlertDraft, AlertId};
use super::repository::{AlertRepository, NotificationRepository, RepositoryError};
use super::scheduler::{EngineKind, Scheduler, SchedulerError};

/// State shared by the engine endpoints: the scheduler for manual triggers
/// plus the stores the read and creation paths need.
pub struct EngineApi<N, L> {
    pub scheduler: Arc<Scheduler>,
    pub notifications: Arc<N>,
    pub alerts: Arc<L>,
}

impl<N, L> EngineApi<N, L> {
    pub fn new(scheduler: Arc<Scheduler>, notifications: Arc<N>, alerts: Arc<L>) -> Self {
        Self {
            scheduler,
            notifications,
            alerts,
        }
    }
}

static ALERT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_alert_id() -> AlertId {
    let id = ALERT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AlertId(format!("alr-{id:06}"))
}

/// Router builder exposing the manual trigger, notification listing, and
/// alert creation endpoints.
pub fn engine_router<N, L>(api: Arc<EngineApi<N, L>>) -> Router
where
    N: NotificationRepository + 'static,
    L: AlertRepository + 'static,
{
    Router::new()
        .route("/api/v1/engine/:engine/run", post(run_handler::<N, L>))
        .route(
            "/api/v1/notifications/:recipient_id",
            get(notifications_handler::<N, L>),
        )
        .route("/api/v1/alerts", post(create_alert_handler::<N, L>))
        .with_state(api)
}

pub(crate) async fn run_handler<N, L>(
    State(api): State<Arc<EngineApi<N, L>>>,
    Path(engine): Path<String>,
) -> Response
where
    N: NotificationRepository + 'static,
    L: AlertRepository + 'static,
{
    let Some(kind) = EngineKind::parse(&engine) else {
        let payload = json!({ "error": format!("unknown engine '{engine}'") });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    match api.scheduler.run_now(kind) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err @ SchedulerError::Busy { .. }) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err @ SchedulerError::NotRegistered { .. }) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn notifications_handler<N, L>(
    State(api): State<Arc<EngineApi<N, L>>>,
    Path(recipient_id): Path<String>,
) -> Response
where
    N: NotificationRepository + 'static,
    L: AlertRepository + 'static,
{
    match api.notifications.for_recipient(&recipient_id) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_alert_handler<N, L>(
    State(api): State<Arc<EngineApi<N, L>>>,
    axum::Json(draft): axum::Json<AlertDraft>,
) -> Response
where
    N: NotificationRepository + 'static,
    L: AlertRepository + 'static,
{
    if let Err(err) = draft.validate() {
        let payload = json!({ "error": err.to_string() });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    let alert = draft.into_alert(next_alert_id());
    match api.alerts.insert(alert) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(RepositoryError::Conflict) => {
            let payload = json!({ "error": "alert already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
