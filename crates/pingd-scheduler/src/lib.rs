//! # pingd Scheduler
//!
//! [`CronScheduler`] implements the [`Scheduler`] protocol on tokio. Cron
//! expressions use the `cron` crate grammar: 6 or 7 fields, seconds first,
//! evaluated in UTC.
//!
//! ```text
//! "*/5 * * * * *"      every 5 seconds
//! "0 */15 * * * *"     every 15 minutes
//! "0 0 9 * * MON-FRI"  9 AM on weekdays
//! ```
//!
//! [`Scheduler`]: pingd_protocols::Scheduler

mod cron_scheduler;

pub use cron_scheduler::CronScheduler;
