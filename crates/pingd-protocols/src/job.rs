//! Job model.
//!
//! A [`JobConfig`] is the durable unit of work: a cron expression, the id the
//! job is known by everywhere (scheduler tag and store key) and the HTTP probe
//! [`Task`] that runs on every firing.
//!
//! The JSON field names follow the records written by earlier deployments
//! (`CronExpression`, `UID`, `URL`, ...) so those records stay readable.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Job configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Cron expression, judged by the scheduler at registration time.
    #[serde(rename = "CronExpression")]
    pub cron_expression: String,
    /// Job id. Assigned once at creation and never reused.
    #[serde(rename = "UID")]
    pub id: JobId,
    /// Probe definition.
    #[serde(rename = "Task")]
    pub task: Task,
}

impl JobConfig {
    /// Create a config for an already assigned id.
    pub fn new(id: JobId, cron_expression: impl Into<String>, task: Task) -> Self {
        Self {
            cron_expression: cron_expression.into(),
            id,
            task,
        }
    }

    /// The scheduler tag and store key for this job.
    pub fn tag(&self) -> String {
        self.id.to_string()
    }
}

/// HTTP probe definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Target endpoint.
    #[serde(rename = "URL")]
    pub url: String,
    /// Bound on a single probe invocation.
    #[serde(rename = "Timeout", with = "duration_nanos", default)]
    pub timeout: Duration,
    /// Authorization header; an empty scheme sends none.
    #[serde(rename = "AuthHeader", default)]
    pub auth_header: AuthHeader,
    /// Reserved; not used by execution. `Null` when unset.
    #[serde(rename = "ExpectedResponse", default)]
    pub expected_response: serde_json::Value,
}

impl Task {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            auth_header: AuthHeader::default(),
            expected_response: serde_json::Value::Null,
        }
    }

    pub fn with_auth(mut self, scheme: impl Into<String>, parameters: impl Into<String>) -> Self {
        self.auth_header = AuthHeader {
            scheme: scheme.into(),
            parameters: parameters.into(),
        };
        self
    }

    pub fn with_expected_response(mut self, expected: serde_json::Value) -> Self {
        self.expected_response = expected;
        self
    }
}

/// Authorization header parts, kept as raw strings until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeader {
    #[serde(rename = "Scheme", default)]
    pub scheme: String,
    #[serde(rename = "Parameters", default)]
    pub parameters: String,
}

impl AuthHeader {
    /// Parse the scheme. `Ok(None)` means no header is sent; `Err` carries the
    /// unrecognized scheme.
    pub fn parsed_scheme(&self) -> Result<Option<AuthScheme>, String> {
        if self.scheme.is_empty() {
            return Ok(None);
        }
        self.scheme
            .parse()
            .map(Some)
            .map_err(|_| self.scheme.clone())
    }
}

/// Supported authorization schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Bearer,
    Basic,
    Digest,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Basic => "Basic",
            AuthScheme::Digest => "Digest",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bearer" => Ok(AuthScheme::Bearer),
            "Basic" => Ok(AuthScheme::Basic),
            "Digest" => Ok(AuthScheme::Digest),
            _ => Err(()),
        }
    }
}

/// Durations as integer nanoseconds.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
