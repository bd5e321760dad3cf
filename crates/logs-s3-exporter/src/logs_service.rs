// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The remote log service as seen by the exporter.
//!
//! Every listing is exposed one page at a time so the callers own the pagination and can
//! decide how far to read.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of one log stream taken when it was listed.
///
/// All times are milliseconds since the epoch, `0` meaning the service did not report one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamDescriptor {
    pub name: String,
    pub last_event_time: i64,
    pub creation_time: i64,
    pub last_ingestion_time: i64,
}

/// One page of a listing. A missing `next_token` marks the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            next_token: None,
        }
    }

    pub fn with_next_token(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Page {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Parameters of a `CreateExportTask` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTaskRequest {
    pub log_group_name: String,
    pub from_time: i64,
    pub to_time: i64,
    pub destination: String,
    pub destination_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportTaskStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
    Unknown,
}

impl ExportTaskStatus {
    /// Maps a CloudWatch Logs status code. Pending states are folded into the state they
    /// lead to.
    pub fn from_code(code: &str) -> Self {
        match code {
            "RUNNING" | "PENDING" => ExportTaskStatus::Running,
            "COMPLETED" => ExportTaskStatus::Completed,
            "FAILED" => ExportTaskStatus::Failed,
            "CANCELLED" | "PENDING_CANCEL" => ExportTaskStatus::Cancelled,
            _ => ExportTaskStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTaskStatus::Running => "RUNNING",
            ExportTaskStatus::Completed => "COMPLETED",
            ExportTaskStatus::Failed => "FAILED",
            ExportTaskStatus::Cancelled => "CANCELLED",
            ExportTaskStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ExportTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by a [`LogsService`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogsServiceError {
    /// The service rejected the request with an error code.
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The request did not get an answer from the service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered without a field the exporter relies on.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl LogsServiceError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        LogsServiceError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The service error code, when the service produced one.
    pub fn code(&self) -> Option<&str> {
        match self {
            LogsServiceError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[async_trait]
pub trait LogsService: Send + Sync {
    /// Lists log group names, optionally restricted to names starting with `prefix`.
    async fn describe_log_groups(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<String>, LogsServiceError>;

    /// Lists the streams of a log group ordered by last event time, oldest first.
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamDescriptor>, LogsServiceError>;

    /// Submits an export task and returns the id the service assigned to it.
    async fn create_export_task(
        &self,
        request: &ExportTaskRequest,
    ) -> Result<String, LogsServiceError>;

    /// Looks up the status of an export task. `None` when the service does not know the id.
    async fn describe_export_task(
        &self,
        task_id: &str,
    ) -> Result<Option<ExportTaskStatus>, LogsServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_code() {
        assert_eq!(ExportTaskStatus::from_code("RUNNING"), ExportTaskStatus::Running);
        assert_eq!(ExportTaskStatus::from_code("PENDING"), ExportTaskStatus::Running);
        assert_eq!(
            ExportTaskStatus::from_code("COMPLETED"),
            ExportTaskStatus::Completed
        );
        assert_eq!(ExportTaskStatus::from_code("FAILED"), ExportTaskStatus::Failed);
        assert_eq!(
            ExportTaskStatus::from_code("PENDING_CANCEL"),
            ExportTaskStatus::Cancelled
        );
        assert_eq!(ExportTaskStatus::from_code("bogus"), ExportTaskStatus::Unknown);
    }

    #[test]
    fn test_status_serializes_in_upper_case() {
        let json = serde_json::to_string(&ExportTaskStatus::Running).unwrap();
        assert_eq!(json, "\"RUNNING\"");
        assert_eq!(ExportTaskStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn test_error_display() {
        let error = LogsServiceError::service("LimitExceededException", "too many tasks");
        assert_eq!(error.to_string(), "LimitExceededException: too many tasks");
        assert_eq!(error.code(), Some("LimitExceededException"));

        let error = LogsServiceError::Transport("dispatch failure".into());
        assert_eq!(error.to_string(), "Transport error: dispatch failure");
        assert_eq!(error.code(), None);
    }
}
