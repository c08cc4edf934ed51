//! HTTP probe execution.
//!
//! A [`Probe`] is the immutable per-job descriptor: everything one firing
//! needs, validated once when the job is scheduled. [`execute`] is the
//! stateless function that runs it. Registering the same [`JobConfig`] twice
//! (at creation and again during reconciliation) builds identical probes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info, warn};

use pingd_protocols::{JobConfig, JobFn, JobId};

use crate::error::AutomatorError;

/// Per-job probe descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub job_id: JobId,
    pub url: String,
    pub timeout: Duration,
    /// Full `Authorization` header value, if any.
    pub authorization: Option<String>,
}

impl Probe {
    /// Build the descriptor for `config`, rejecting unknown auth schemes.
    ///
    /// A zero task timeout falls back to `default_timeout`.
    pub fn from_config(config: &JobConfig, default_timeout: Duration) -> Result<Self, AutomatorError> {
        let header = &config.task.auth_header;
        let authorization = header
            .parsed_scheme()
            .map_err(|scheme| AutomatorError::InvalidScheme {
                id: config.id,
                scheme,
            })?
            .map(|scheme| format!("{} {}", scheme, header.parameters));

        let timeout = if config.task.timeout.is_zero() {
            default_timeout
        } else {
            config.task.timeout
        };

        Ok(Self {
            job_id: config.id,
            url: config.task.url.clone(),
            timeout,
            authorization,
        })
    }
}

/// Result of one successful probe request.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub status: StatusCode,
    pub duration: Duration,
    /// Decoded body when the response declared JSON and it parsed.
    pub body: Option<serde_json::Value>,
}

/// Probe failures. Local to one firing.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Run `probe` once.
pub async fn execute(client: &Client, probe: &Probe) -> Result<ProbeOutcome, ProbeError> {
    let mut request = client.get(probe.url.as_str()).timeout(probe.timeout);
    if let Some(value) = &probe.authorization {
        request = request.header(AUTHORIZATION, value);
    }

    let started = Instant::now();
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProbeError::Timeout(probe.timeout)
        } else {
            ProbeError::Request(e)
        }
    })?;

    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let body = if is_json {
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(probe.timeout)
            } else {
                ProbeError::Body(e)
            }
        })?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(job_id = %probe.job_id, error = %e, "Failed to decode JSON response body");
                None
            }
        }
    } else {
        None
    };

    Ok(ProbeOutcome {
        status,
        duration: started.elapsed(),
        body,
    })
}

/// Wrap `probe` as the scheduler-facing job function.
///
/// Failures are logged and dropped; the next cron firing is the only retry.
pub fn job_fn(client: Client, probe: Arc<Probe>) -> JobFn {
    Arc::new(move || {
        let client = client.clone();
        let probe = Arc::clone(&probe);
        async move {
            match execute(&client, &probe).await {
                Ok(outcome) => {
                    let duration_ms = outcome.duration.as_millis() as u64;
                    match &outcome.body {
                        Some(body) => info!(
                            job_id = %probe.job_id,
                            status = outcome.status.as_u16(),
                            duration_ms,
                            body = %body,
                            "Probe completed"
                        ),
                        None => info!(
                            job_id = %probe.job_id,
                            status = outcome.status.as_u16(),
                            duration_ms,
                            "Probe completed"
                        ),
                    }
                }
                Err(e) => {
                    error!(job_id = %probe.job_id, url = %probe.url, error = %e, "Probe failed");
                }
            }
        }
        .boxed()
    })
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
