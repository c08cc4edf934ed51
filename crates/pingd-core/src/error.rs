//! Automator and codec error types.

use thiserror::Error;

use pingd_protocols::{JobId, SchedulerError, StoreError};

/// Errors from encrypting or decrypting a job record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Secret key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Failed to serialize job config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to encrypt job config")]
    Encrypt,

    #[error("Record is not valid hex: {0}")]
    Decode(#[from] hex::FromHexError),

    #[error("Record too short: {0} bytes")]
    Truncated(usize),

    #[error("Record failed authentication (wrong key or corrupted data)")]
    Authentication,

    #[error("Failed to deserialize job config: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Coarse error categories for callers such as the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Encryption,
    Decryption,
    NotFound,
    BackingStore,
    Scheduling,
    OrphanedSchedule,
}

/// Automator errors. Each carries the failing step and job id.
#[derive(Debug, Error)]
pub enum AutomatorError {
    #[error("Invalid auth scheme '{scheme}' for job {id}")]
    InvalidScheme { id: JobId, scheme: String },

    #[error("Failed to encrypt job {id}: {source}")]
    Encryption {
        id: JobId,
        #[source]
        source: CodecError,
    },

    #[error("Failed to decrypt job {id}: {source}")]
    Decryption {
        id: JobId,
        #[source]
        source: CodecError,
    },

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Store failed to {step} for job {id}: {source}")]
    Store {
        step: &'static str,
        id: JobId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to read job index set '{set}': {source}")]
    IndexSet {
        set: String,
        #[source]
        source: StoreError,
    },

    #[error("Scheduler failed to {step} job {id}: {source}")]
    Scheduling {
        step: &'static str,
        id: JobId,
        #[source]
        source: SchedulerError,
    },

    #[error(
        "Job {id} is scheduled without a durable record and needs manual removal \
         (store: {store_error}; cleanup: {cleanup_error})"
    )]
    OrphanedSchedule {
        id: JobId,
        store_error: StoreError,
        cleanup_error: SchedulerError,
    },
}

impl AutomatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AutomatorError::InvalidScheme { .. } => ErrorKind::Validation,
            AutomatorError::Scheduling {
                source: SchedulerError::InvalidCronExpression { .. },
                ..
            } => ErrorKind::Validation,
            AutomatorError::Scheduling { .. } => ErrorKind::Scheduling,
            AutomatorError::Encryption { .. } => ErrorKind::Encryption,
            AutomatorError::Decryption { .. } => ErrorKind::Decryption,
            AutomatorError::NotFound(_) => ErrorKind::NotFound,
            AutomatorError::Store { .. } | AutomatorError::IndexSet { .. } => {
                ErrorKind::BackingStore
            }
            AutomatorError::OrphanedSchedule { .. } => ErrorKind::OrphanedSchedule,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AutomatorError::NotFound(_))
    }

    /// The job this error concerns, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            AutomatorError::InvalidScheme { id, .. }
            | AutomatorError::Encryption { id, .. }
            | AutomatorError::Decryption { id, .. }
            | AutomatorError::NotFound(id)
            | AutomatorError::Store { id, .. }
            | AutomatorError::Scheduling { id, .. }
            | AutomatorError::OrphanedSchedule { id, .. } => Some(*id),
            AutomatorError::IndexSet { .. } => None,
        }
    }
}
