//! Job endpoints.

pub mod routes;

use serde::{Deserialize, Serialize};

use pingd_protocols::{JobId, Task};

/// Body of `POST /jobs`. Any `UID` in the body is ignored; ids are assigned
/// on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    #[serde(rename = "CronExpression")]
    pub cron_expression: String,
    #[serde(rename = "Task")]
    pub task: Task,
}

/// Message or id response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "UID", default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<JobId>,
}

impl GenericResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            uid: None,
        }
    }

    pub fn uid(uid: JobId) -> Self {
        Self {
            message: None,
            uid: Some(uid),
        }
    }
}
