//! Drift reconciliation.
//!
//! The scheduler's state is volatile and the store is authoritative. Each
//! tick compares the durable job index set against the scheduler's active
//! tags and re-registers whatever is missing. This is the only recovery path
//! after a restart. A drifted job is never deleted for being drifted.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use pingd_protocols::JobId;

use crate::automator::Automator;
use crate::error::AutomatorError;

/// Default interval between reconciliation ticks.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(10);

/// Ids in `durable` that have no active schedule entry, sorted.
pub fn compute_missing(durable: &HashSet<String>, active: &HashSet<String>) -> Vec<String> {
    let mut missing: Vec<String> = durable.difference(active).cloned().collect();
    missing.sort();
    missing
}

/// Outcome of one reconciliation tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids in the index set.
    pub expected: usize,
    /// Active scheduler tags when the tick read them.
    pub active: usize,
    pub missing: usize,
    pub rescheduled: usize,
    /// Missing ids that could not be restored this tick.
    pub skipped: usize,
}

/// Periodic repair loop over an [`Automator`].
pub struct Reconciler {
    automator: Arc<Automator>,
    interval: Duration,
}

impl Reconciler {
    pub fn new(automator: Arc<Automator>) -> Self {
        Self {
            automator,
            interval: DEFAULT_RECONCILE_INTERVAL,
        }
    }

    /// Set the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one pass. Fails only when the index set cannot be read.
    pub async fn tick(&self) -> Result<ReconcileReport, AutomatorError> {
        let set_name = self.automator.job_set_name();
        let durable = self
            .automator
            .store()
            .get_set(set_name)
            .await
            .map_err(|source| AutomatorError::IndexSet {
                set: set_name.to_string(),
                source,
            })?;
        let active = self.automator.scheduler().active_tags();
        let missing = compute_missing(&durable, &active);

        let mut report = ReconcileReport {
            expected: durable.len(),
            active: active.len(),
            missing: missing.len(),
            ..Default::default()
        };

        for tag in &missing {
            let id: JobId = match tag.parse() {
                Ok(id) => id,
                Err(e) => {
                    warn!(tag = %tag, error = %e, "Index set entry is not a job id, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            let config = match self.automator.get_job(&id).await {
                Ok(config) => config,
                Err(e) => {
                    warn!(job_id = %id, error = %e, "Failed to read job, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            // Registering under a different id would never satisfy this entry.
            if config.id != id {
                warn!(
                    job_id = %id,
                    record_id = %config.id,
                    "Record is stored under another job's id, skipping"
                );
                report.skipped += 1;
                continue;
            }

            if let Err(e) = self.automator.schedule(&config) {
                warn!(job_id = %id, error = %e, "Failed to reschedule job, skipping");
                report.skipped += 1;
                continue;
            }

            if self.deleted_meanwhile(tag).await {
                report.skipped += 1;
                continue;
            }

            info!(job_id = %id, "Rescheduled drifted job");
            report.rescheduled += 1;
        }

        if report.missing > 0 {
            info!(
                "Reconciliation: {} expected, {} missing, {} rescheduled, {} skipped",
                report.expected, report.missing, report.rescheduled, report.skipped
            );
        } else {
            debug!("Reconciliation: {} jobs in sync", report.expected);
        }

        Ok(report)
    }

    /// Undo a registration whose record was deleted while this tick ran.
    async fn deleted_meanwhile(&self, tag: &str) -> bool {
        match self.automator.store().get(tag).await {
            Err(e) if e.is_not_found() => {
                debug!(tag = %tag, "Job deleted during reconciliation, unscheduling");
                if let Err(e) = self.automator.scheduler().remove_by_tag(tag) {
                    warn!(tag = %tag, error = %e, "Failed to unschedule deleted job");
                }
                true
            }
            _ => false,
        }
    }

    /// Tick until `shutdown` fires, then stop the scheduler.
    ///
    /// The first tick runs immediately. Ticks never overlap; a tick that
    /// overruns the interval delays the next one instead of queueing it.
    pub async fn run(self: Arc<Self>, shutdown: watch::Receiver<bool>) {
        info!("Reconciler started (interval: {:?})", self.interval);

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown = shutdown;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        error!("Reconciliation failed: {}", e);
                    }
                }
                _ = shutdown.changed() => {
                    info!("Reconciler shutting down");
                    break;
                }
            }
        }

        self.automator.scheduler().stop();
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
