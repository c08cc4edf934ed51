//! Job automator.
//!
//! Keeps the encrypted job records in the [`Store`] and the live schedule in
//! the [`Scheduler`] consistent. Create registers the schedule entry first and
//! persists second, removing the entry again if the write fails. Delete runs
//! the other way round: unschedule first so the job cannot fire after its
//! record is gone.
//!
//! Multi-step operations take no lock across steps. Each step relies on the
//! collaborator's own concurrency safety.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, debug_span, error, info, info_span, warn, Instrument};

use pingd_protocols::{JobConfig, JobId, Scheduler, Store, StoreError, Task};

use crate::codec::{JobCodec, SecretKey};
use crate::error::AutomatorError;
use crate::probe::{self, Probe};

/// Default name of the durable job index set.
pub const DEFAULT_JOB_SET_NAME: &str = "jobs_set";

/// Automator settings.
#[derive(Debug, Clone)]
pub struct AutomatorOptions {
    /// Index set of ids that should be scheduled.
    pub job_set_name: String,
    /// Used when a task carries a zero timeout.
    pub default_probe_timeout: Duration,
    /// Shared by every probe.
    pub http_client: Client,
}

impl Default for AutomatorOptions {
    fn default() -> Self {
        Self {
            job_set_name: DEFAULT_JOB_SET_NAME.to_string(),
            default_probe_timeout: Duration::from_secs(30),
            http_client: Client::new(),
        }
    }
}

/// Orchestrates job create, read and delete across codec, scheduler and store.
pub struct Automator {
    store: Arc<dyn Store>,
    scheduler: Arc<dyn Scheduler>,
    codec: JobCodec,
    options: AutomatorOptions,
}

impl Automator {
    pub fn new(
        store: Arc<dyn Store>,
        scheduler: Arc<dyn Scheduler>,
        key: &SecretKey,
        options: AutomatorOptions,
    ) -> Self {
        Self {
            store,
            scheduler,
            codec: JobCodec::new(key),
            options,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn job_set_name(&self) -> &str {
        &self.options.job_set_name
    }

    /// Create, schedule and persist a new job. Returns its id.
    pub async fn create_job(
        &self,
        cron_expression: impl Into<String>,
        task: Task,
    ) -> Result<JobId, AutomatorError> {
        let config = JobConfig::new(JobId::new(), cron_expression, task);
        let span = info_span!("create_job", job_id = %config.id);
        self.create_job_inner(config).instrument(span).await
    }

    async fn create_job_inner(&self, config: JobConfig) -> Result<JobId, AutomatorError> {
        let id = config.id;
        let tag = config.tag();

        let record = self
            .codec
            .encrypt(&config)
            .map_err(|source| AutomatorError::Encryption { id, source })?;

        self.schedule(&config)?;

        if let Err(store_error) = self.store.insert(&tag, &record).await {
            if let Err(cleanup_error) = self.scheduler.remove_by_tag(&tag) {
                error!(
                    job_id = %id,
                    store_error = %store_error,
                    cleanup_error = %cleanup_error,
                    "Job is scheduled without a durable record; manual removal required"
                );
                return Err(AutomatorError::OrphanedSchedule {
                    id,
                    store_error,
                    cleanup_error,
                });
            }
            warn!(job_id = %id, error = %store_error, "Failed to persist job, schedule removed");
            return Err(AutomatorError::Store {
                step: "insert record",
                id,
                source: store_error,
            });
        }

        if let Err(e) = self
            .store
            .add_to_set(&self.options.job_set_name, std::slice::from_ref(&tag))
            .await
        {
            warn!(
                job_id = %id,
                set = %self.options.job_set_name,
                error = %e,
                "Failed to add job to index set; it will not be restored after a restart"
            );
        }

        info!(job_id = %id, cron = %config.cron_expression, url = %config.task.url, "Job created");
        Ok(id)
    }

    /// Register `config` with the scheduler under its id.
    ///
    /// Shared by create and reconciliation so both build the same probe.
    pub(crate) fn schedule(&self, config: &JobConfig) -> Result<(), AutomatorError> {
        let probe = Probe::from_config(config, self.options.default_probe_timeout)?;
        let job = probe::job_fn(self.options.http_client.clone(), Arc::new(probe));

        self.scheduler
            .register(&config.cron_expression, &config.tag(), job)
            .map_err(|source| AutomatorError::Scheduling {
                step: "register",
                id: config.id,
                source,
            })
    }

    /// Fetch and decrypt the record for `id`.
    pub async fn get_job(&self, id: &JobId) -> Result<JobConfig, AutomatorError> {
        let span = debug_span!("get_job", job_id = %id);
        self.get_job_inner(*id).instrument(span).await
    }

    async fn get_job_inner(&self, id: JobId) -> Result<JobConfig, AutomatorError> {
        let record = match self.store.get(&id.to_string()).await {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                debug!(job_id = %id, "Job record not found");
                return Err(AutomatorError::NotFound(id));
            }
            Err(source) => {
                return Err(AutomatorError::Store {
                    step: "get record",
                    id,
                    source,
                });
            }
        };

        self.codec
            .decrypt(&record)
            .map_err(|source| AutomatorError::Decryption { id, source })
    }

    /// Jobs with an active schedule entry, sorted by id.
    ///
    /// Tags that are not job ids and records deleted since the tags were read
    /// are skipped. Any other failure aborts the listing.
    pub async fn running_jobs(&self) -> Result<Vec<JobConfig>, AutomatorError> {
        let mut ids: Vec<JobId> = self
            .scheduler
            .active_tags()
            .iter()
            .filter_map(|tag| tag.parse().ok())
            .collect();
        ids.sort();

        let mut jobs = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_job(&id).await {
                Ok(config) => jobs.push(config),
                Err(AutomatorError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(jobs)
    }

    /// Unschedule the job, then delete its record and index entry.
    ///
    /// Not isolated from a concurrent reconciliation tick. A tick that reads
    /// the record before it is deleted re-checks it after registering and
    /// unschedules again. If that re-check also lands before the delete, the
    /// entry stays active without a record until the next restart.
    pub async fn delete_job(&self, id: &JobId) -> Result<(), AutomatorError> {
        let id = *id;
        let span = info_span!("delete_job", job_id = %id);
        async move {
            let tag = id.to_string();

            self.scheduler
                .remove_by_tag(&tag)
                .map_err(|source| AutomatorError::Scheduling {
                    step: "remove",
                    id,
                    source,
                })?;

            self.store
                .delete(&tag)
                .await
                .map_err(|source| AutomatorError::Store {
                    step: "delete record",
                    id,
                    source,
                })?;

            self.store
                .remove_from_set(&self.options.job_set_name, std::slice::from_ref(&tag))
                .await
                .map_err(|source| AutomatorError::Store {
                    step: "remove from index set",
                    id,
                    source,
                })?;

            info!(job_id = %id, "Job deleted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "automator_tests.rs"]
mod tests;
