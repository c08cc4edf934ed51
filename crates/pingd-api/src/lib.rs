//! # pingd API
//!
//! HTTP surface over the job automator.
//!
//! ```text
//! GET    /health            - Liveness, {"status": "up"}
//! POST   /jobs              - Create job, 201 {"UID": ...}
//! GET    /jobs              - Jobs with a live schedule entry
//! GET    /jobs/{id}/config  - Stored job config
//! DELETE /jobs/{id}         - Unschedule and delete, 204
//! ```

pub mod error;
pub mod job;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiServer, ServerOptions};
pub use state::ApiState;
