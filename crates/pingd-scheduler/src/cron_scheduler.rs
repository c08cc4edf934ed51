//! Tokio-backed cron scheduler.
//!
//! Each entry owns one loop task that sleeps until the next occurrence of its
//! schedule and then spawns the job future. Firings are detached: a slow
//! probe never delays the next occurrence, and the scheduler never awaits
//! job output.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};

use pingd_protocols::{JobFn, Scheduler, SchedulerError};

struct Entry {
    tag: String,
    cron_expr: String,
    schedule: Schedule,
    job: JobFn,
    fire_count: Arc<AtomicU64>,
    /// Loop task, present while the scheduler is running.
    handle: Option<JoinHandle<()>>,
}

impl Entry {
    fn spawn(&mut self, runtime: &Handle) {
        let tag = self.tag.clone();
        let schedule = self.schedule.clone();
        let job = Arc::clone(&self.job);
        let fire_count = Arc::clone(&self.fire_count);
        self.handle = Some(runtime.spawn(run_entry(tag, schedule, job, fire_count)));
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Cron scheduler keyed by tag.
///
/// Entries registered before [`start`](Scheduler::start) are parked until
/// then. [`stop`](Scheduler::stop) aborts every loop but keeps the entry
/// table, so [`active_tags`](Scheduler::active_tags) still reflects
/// registrations until they are removed.
pub struct CronScheduler {
    runtime: Handle,
    entries: Mutex<Vec<Entry>>,
    running: AtomicBool,
    stopped: AtomicBool,
}

impl CronScheduler {
    /// Create a scheduler on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when called outside a runtime.
    pub fn new() -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|e| SchedulerError::Internal(e.to_string()))?;
        Ok(Self::with_handle(runtime))
    }

    /// Create a scheduler that spawns onto `runtime`.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            entries: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Earliest upcoming firing among the entries under `tag`.
    pub fn next_fire_time(&self, tag: &str) -> Option<DateTime<Utc>> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.tag == tag)
            .filter_map(|e| e.schedule.upcoming(Utc).next())
            .min()
    }

    /// Times the entries under `tag` have fired.
    pub fn fire_count(&self, tag: &str) -> u64 {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| e.fire_count.load(Ordering::Relaxed))
            .sum()
    }

    /// Cron expressions registered under `tag`.
    pub fn expressions(&self, tag: &str) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| e.cron_expr.clone())
            .collect()
    }
}

impl Scheduler for CronScheduler {
    fn register(&self, cron_expression: &str, tag: &str, job: JobFn) -> Result<(), SchedulerError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(SchedulerError::Stopped);
        }

        let schedule = Schedule::from_str(cron_expression).map_err(|e| {
            SchedulerError::InvalidCronExpression {
                expression: cron_expression.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut entry = Entry {
            tag: tag.to_string(),
            cron_expr: cron_expression.to_string(),
            schedule,
            job,
            fire_count: Arc::new(AtomicU64::new(0)),
            handle: None,
        };

        let mut entries = self.entries.lock();
        if self.running.load(Ordering::SeqCst) {
            entry.spawn(&self.runtime);
        }
        debug!("Registered '{}' with schedule '{}'", tag, cron_expression);
        entries.push(entry);
        Ok(())
    }

    fn remove_by_tag(&self, tag: &str) -> Result<(), SchedulerError> {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain_mut(|e| {
            if e.tag == tag {
                e.abort();
                false
            } else {
                true
            }
        });

        if entries.len() == before {
            return Err(SchedulerError::TagNotFound(tag.to_string()));
        }
        debug!("Removed {} entries for '{}'", before - entries.len(), tag);
        Ok(())
    }

    fn active_tags(&self) -> HashSet<String> {
        self.entries.lock().iter().map(|e| e.tag.clone()).collect()
    }

    fn start(&self) {
        let mut entries = self.entries.lock();
        self.stopped.store(false, Ordering::SeqCst);
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        for entry in entries.iter_mut() {
            entry.spawn(&self.runtime);
        }
        info!("Cron scheduler started with {} entries", entries.len());
    }

    fn stop(&self) {
        let mut entries = self.entries.lock();
        self.stopped.store(true, Ordering::SeqCst);
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        for entry in entries.iter_mut() {
            entry.abort();
        }
        info!("Cron scheduler stopped");
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for CronScheduler {
    fn drop(&mut self) {
        for entry in self.entries.get_mut().iter_mut() {
            entry.abort();
        }
    }
}

/// Fire `job` on every occurrence of `schedule` until aborted.
async fn run_entry(tag: String, schedule: Schedule, job: JobFn, fire_count: Arc<AtomicU64>) {
    let mut last = Utc::now();
    loop {
        // Occurrences missed while asleep are skipped, never replayed.
        let from = last.max(Utc::now());
        let Some(next) = schedule.after(&from).next() else {
            debug!("'{}' has no upcoming occurrence", tag);
            return;
        };

        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        last = next;

        fire_count.fetch_add(1, Ordering::Relaxed);
        debug!("Firing '{}' scheduled for {}", tag, next.to_rfc3339());
        let span = info_span!("job", tag = %tag);
        tokio::spawn(job().instrument(span));
    }
}

#[cfg(test)]
#[path = "cron_scheduler_tests.rs"]
mod tests;
