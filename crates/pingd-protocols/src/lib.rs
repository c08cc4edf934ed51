//! # pingd Protocols
//!
//! Value types and collaborator interfaces shared by every pingd crate.
//! Contains only definitions - no implementations.
//!
//! ## Core Types
//!
//! - [`JobConfig`] - The durable unit of work (cron expression + probe task)
//! - [`Task`] / [`AuthHeader`] - The HTTP probe definition
//!
//! ## Collaborator Traits
//!
//! - [`Store`] - Durable key-value and keyed-set storage
//! - [`Scheduler`] - Registers and removes recurring jobs by tag

pub mod error;
pub mod job;
pub mod scheduler;
pub mod store;

pub use error::{SchedulerError, StoreError};
pub use job::{AuthHeader, AuthScheme, JobConfig, JobId, Task};
pub use scheduler::{JobFn, Scheduler};
pub use store::Store;
