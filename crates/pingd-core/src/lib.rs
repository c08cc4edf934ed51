//! # pingd Core
//!
//! The job automator: keeps encrypted job records in a [`Store`] and the live
//! schedule in a [`Scheduler`] consistent with each other.
//!
//! ## Components
//!
//! - **Codec**: AES-256-GCM encryption of serialized [`JobConfig`]s at rest
//! - **Automator**: create / get / list / delete with compensation on failure
//! - **Probe**: immutable per-job descriptor plus a stateless execution function
//! - **Reconciler**: periodic repair of drift between the job index set and
//!   the scheduler's active tags
//!
//! ```text
//!   create/delete/get ──▶ Automator ──▶ Codec
//!                            │   │
//!                            │   └──────▶ Store (records + index set)
//!                            ▼
//!                        Scheduler ◀── Reconciler (every 10s)
//!                            │
//!                            ▼
//!                     probe::execute (on each cron firing)
//! ```
//!
//! [`Store`]: pingd_protocols::Store
//! [`Scheduler`]: pingd_protocols::Scheduler
//! [`JobConfig`]: pingd_protocols::JobConfig

pub mod automator;
pub mod codec;
pub mod error;
pub mod probe;
pub mod reconciler;

#[cfg(test)]
mod testing;

pub use automator::{Automator, AutomatorOptions, DEFAULT_JOB_SET_NAME};
pub use codec::{decrypt, encrypt, JobCodec, SecretKey};
pub use error::{AutomatorError, CodecError, ErrorKind};
pub use probe::{Probe, ProbeError, ProbeOutcome};
pub use reconciler::{compute_missing, ReconcileReport, Reconciler, DEFAULT_RECONCILE_INTERVAL};
