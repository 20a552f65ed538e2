use std::fmt;
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::auto_apply::{AutoApplyRunSummary, EngineError};
use super::talent_radar::TalentRadarRunSummary;

/// The two recurring batch engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    AutoApply,
    TalentRadar,
}

impl EngineKind {
    pub const fn label(self) -> &'static str {
        match self {
            EngineKind::AutoApply => "auto-apply",
            EngineKind::TalentRadar => "talent-radar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto-apply" => Some(Self::AutoApply),
            "talent-radar" => Some(Self::TalentRadar),
            _ => None,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary of whichever engine a tick ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RunSummary {
    AutoApply(AutoApplyRunSummary),
    TalentRadar(TalentRadarRunSummary),
}

impl RunSummary {
    /// (entities scanned, side effects created) for audit counters.
    pub fn counts(&self) -> (usize, usize) {
        match self {
            RunSummary::AutoApply(summary) => {
                (summary.candidates_scanned, summary.applications_created)
            }
            RunSummary::TalentRadar(summary) => {
                (summary.alerts_scanned, summary.matches_recorded)
            }
        }
    }
}

/// What a completed manual trigger hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub engine: EngineKind,
    pub finished_at: DateTime<Utc>,
    pub summary: RunSummary,
}

/// Audit record written after every tick, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub engine: EngineKind,
    pub recorded_at: DateTime<Utc>,
    pub outcome: TickOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum TickOutcome {
    Completed { scanned: usize, produced: usize },
    Failed { error: String },
    Skipped,
}

impl AuditEntry {
    fn completed(engine: EngineKind, scanned: usize, produced: usize) -> Self {
        Self {
            engine,
            recorded_at: Utc::now(),
            outcome: TickOutcome::Completed { scanned, produced },
        }
    }

    fn failed(engine: EngineKind, error: &EngineError) -> Self {
        Self {
            engine,
            recorded_at: Utc::now(),
            outcome: TickOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    fn skipped(engine: EngineKind) -> Self {
        Self {
            engine,
            recorded_at: Utc::now(),
            outcome: TickOutcome::Skipped,
        }
    }
}

/// Append-only activity log collaborator.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

/// Default sink that writes audit entries through `tracing`.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) {
        match &entry.outcome {
            TickOutcome::Completed { scanned, produced } => {
                info!(engine = %entry.engine, scanned, produced, "engine tick completed");
            }
            TickOutcome::Failed { error } => {
                error!(engine = %entry.engine, %error, "engine tick failed");
            }
            TickOutcome::Skipped => {
                warn!(engine = %entry.engine, "engine tick skipped");
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("a {engine} run is already in flight")]
    Busy { engine: EngineKind },
    #[error("engine {engine} is not registered")]
    NotRegistered { engine: EngineKind },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

type EngineRunner = Box<dyn Fn() -> Result<RunSummary, EngineError> + Send + Sync>;

struct EngineTask {
    kind: EngineKind,
    interval: Duration,
    runner: EngineRunner,
    gate: Mutex<()>,
}

/// Owns the recurring ticks for both engines.
///
/// Each engine carries its own no-overlap gate: a trigger arriving while a
/// run of the same engine is in flight is rejected, and an overlapping
/// interval tick is skipped. A failed tick is audited and never stops the
/// loop.
pub struct Scheduler {
    tasks: Vec<Arc<EngineTask>>,
    audit: Arc<dyn AuditSink>,
}

impl Scheduler {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            tasks: Vec::new(),
            audit,
        }
    }

    pub fn register<F>(&mut self, kind: EngineKind, interval: Duration, runner: F)
    where
        F: Fn() -> Result<RunSummary, EngineError> + Send + Sync + 'static,
    {
        self.tasks.push(Arc::new(EngineTask {
            kind,
            interval,
            runner: Box::new(runner),
            gate: Mutex::new(()),
        }));
    }

    /// Manual trigger for operational and testing use.
    pub fn run_now(&self, kind: EngineKind) -> Result<TickReport, SchedulerError> {
        let task = self
            .tasks
            .iter()
            .find(|task| task.kind == kind)
            .ok_or(SchedulerError::NotRegistered { engine: kind })?;

        let _guard = match task.gate.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                return Err(SchedulerError::Busy { engine: kind });
            }
            Err(TryLockError::Poisoned(err)) => panic!("engine gate poisoned: {err}"),
        };

        match (task.runner)() {
            Ok(summary) => {
                let (scanned, produced) = summary.counts();
                self.audit.record(AuditEntry::completed(kind, scanned, produced));
                Ok(TickReport {
                    engine: kind,
                    finished_at: Utc::now(),
                    summary,
                })
            }
            Err(err) => {
                self.audit.record(AuditEntry::failed(kind, &err));
                Err(SchedulerError::Engine(err))
            }
        }
    }

    /// Start one interval loop per registered engine.
    pub fn spawn(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        self.tasks
            .iter()
            .map(|task| {
                let task = task.clone();
                let scheduler = self.clone();
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(task.interval);
                    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                    // The first tick of a tokio interval fires immediately;
                    // consume it so the first run waits a full period.
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        scheduler.tick(&task);
                    }
                })
            })
            .collect()
    }

    fn tick(&self, task: &EngineTask) {
        let _guard = match task.gate.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                warn!(engine = %task.kind, "previous run still in flight, tick skipped");
                self.audit.record(AuditEntry::skipped(task.kind));
                return;
            }
            Err(TryLockError::Poisoned(err)) => panic!("engine gate poisoned: {err}"),
        };

        match (task.runner)() {
            Ok(summary) => {
                let (scanned, produced) = summary.counts();
                self.audit
                    .record(AuditEntry::completed(task.kind, scanned, produced));
            }
            Err(err) => {
                self.audit.record(AuditEntry::failed(task.kind, &err));
            }
        }
    }
}
