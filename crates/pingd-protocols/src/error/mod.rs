//! Error types for the collaborator interfaces.

mod scheduler;
mod store;

pub use scheduler::*;
pub use store::*;
