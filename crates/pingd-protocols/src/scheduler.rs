//! Scheduler protocol definitions.
//!
//! The scheduler owns the live, in-memory schedule. Its state is volatile:
//! after a restart [`Scheduler::active_tags`] is empty until jobs are
//! registered again.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::SchedulerError;

/// Work run on every firing. Each call produces an independent future; the
/// scheduler never consumes its output.
pub type JobFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Recurring job scheduler keyed by tag.
pub trait Scheduler: Send + Sync {
    /// Register `job` to run on `cron_expression` under `tag`.
    ///
    /// Registering a tag that is already active adds a second entry.
    fn register(&self, cron_expression: &str, tag: &str, job: JobFn) -> Result<(), SchedulerError>;

    /// Remove every entry registered under `tag`.
    fn remove_by_tag(&self, tag: &str) -> Result<(), SchedulerError>;

    /// Tags with at least one registered entry.
    fn active_tags(&self) -> HashSet<String>;

    /// Begin firing registered jobs.
    fn start(&self);

    /// Stop firing. In-flight executions are not awaited.
    fn stop(&self);

    fn is_running(&self) -> bool;
}
