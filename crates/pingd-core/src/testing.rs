//! In-memory fakes for automator and reconciler tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use pingd_protocols::{JobFn, Scheduler, SchedulerError, Store, StoreError};
use pingd_store::MemoryStore;

use crate::codec::SecretKey;
use crate::{Automator, AutomatorOptions};

/// Scheduler that records registrations and never fires on its own.
#[derive(Default)]
pub struct RecordingScheduler {
    entries: Mutex<HashMap<String, Vec<(String, JobFn)>>>,
    running: AtomicBool,
    pub fail_register: AtomicBool,
    pub fail_remove: AtomicBool,
}

impl RecordingScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drop every entry, as a process restart would.
    pub fn wipe(&self) {
        self.entries.lock().clear();
    }

    /// Number of entries registered under `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.entries.lock().get(tag).map_or(0, Vec::len)
    }

    pub fn cron_of(&self, tag: &str) -> Option<String> {
        self.entries
            .lock()
            .get(tag)
            .and_then(|e| e.first().map(|(cron, _)| cron.clone()))
    }

    /// Run every job registered under `tag` once.
    pub async fn fire(&self, tag: &str) {
        let jobs: Vec<JobFn> = self
            .entries
            .lock()
            .get(tag)
            .map(|e| e.iter().map(|(_, job)| Arc::clone(job)).collect())
            .unwrap_or_default();
        for job in jobs {
            job().await;
        }
    }
}

impl Scheduler for RecordingScheduler {
    fn register(&self, cron_expression: &str, tag: &str, job: JobFn) -> Result<(), SchedulerError> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(SchedulerError::Internal("register disabled".to_string()));
        }
        let fields = cron_expression.split_whitespace().count();
        if !(6..=7).contains(&fields) {
            return Err(SchedulerError::InvalidCronExpression {
                expression: cron_expression.to_string(),
                reason: format!("expected 6 or 7 fields, got {fields}"),
            });
        }
        self.entries
            .lock()
            .entry(tag.to_string())
            .or_default()
            .push((cron_expression.to_string(), job));
        Ok(())
    }

    fn remove_by_tag(&self, tag: &str) -> Result<(), SchedulerError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(SchedulerError::Internal("remove disabled".to_string()));
        }
        match self.entries.lock().remove(tag) {
            Some(_) => Ok(()),
            None => Err(SchedulerError::TagNotFound(tag.to_string())),
        }
    }

    fn active_tags(&self) -> HashSet<String> {
        self.entries.lock().keys().cloned().collect()
    }

    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// [`MemoryStore`] with switchable failures.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_insert: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_sets: AtomicBool,
    /// After this many more successful reads every key reads as absent.
    pub vanish_after_gets: Mutex<Option<usize>>,
}

impl FaultyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{op} disabled")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn insert(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::check(&self.fail_insert, "insert")?;
        self.inner.insert(key, value).await
    }

    async fn get(&self, key: &str) -> Result<String, StoreError> {
        Self::check(&self.fail_get, "get")?;
        if let Some(remaining) = self.vanish_after_gets.lock().as_mut() {
            if *remaining == 0 {
                return Err(StoreError::NotFound(key.to_string()));
            }
            *remaining -= 1;
        }
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        Self::check(&self.fail_delete, "delete")?;
        self.inner.delete(key).await
    }

    async fn get_set(&self, set_name: &str) -> Result<HashSet<String>, StoreError> {
        Self::check(&self.fail_sets, "get_set")?;
        self.inner.get_set(set_name).await
    }

    async fn add_to_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError> {
        Self::check(&self.fail_sets, "add_to_set")?;
        self.inner.add_to_set(set_name, keys).await
    }

    async fn remove_from_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError> {
        Self::check(&self.fail_sets, "remove_from_set")?;
        self.inner.remove_from_set(set_name, keys).await
    }

    async fn delete_set(&self, set_name: &str) -> Result<(), StoreError> {
        Self::check(&self.fail_sets, "delete_set")?;
        self.inner.delete_set(set_name).await
    }
}

pub struct Fixture {
    pub store: Arc<FaultyStore>,
    pub scheduler: Arc<RecordingScheduler>,
    pub key: SecretKey,
    pub automator: Arc<Automator>,
}

pub fn fixture() -> Fixture {
    let store = FaultyStore::new();
    let scheduler = RecordingScheduler::new();
    let key = SecretKey::generate();
    let automator = Arc::new(Automator::new(
        store.clone(),
        scheduler.clone(),
        &key,
        AutomatorOptions::default(),
    ));
    Fixture {
        store,
        scheduler,
        key,
        automator,
    }
}
