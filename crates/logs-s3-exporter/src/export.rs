// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::logs_service::{
    ExportTaskRequest, ExportTaskStatus, LogStreamDescriptor, LogsService, LogsServiceError,
};
use crate::prefix::destination_prefix;

/// Class of a service error returned by `CreateExportTask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Too many export tasks in flight; a later run picks the group up again.
    LimitExceeded,
    AlreadyExists,
    InvalidParameter,
    Other,
}

impl RemoteErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "LimitExceededException" => RemoteErrorKind::LimitExceeded,
            "ResourceAlreadyExistsException" => RemoteErrorKind::AlreadyExists,
            "InvalidParameterException" => RemoteErrorKind::InvalidParameter,
            _ => RemoteErrorKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Submitted(String),
    /// No stream carried a usable creation or last event time.
    DeclinedEmptyRange,
    DeclinedRemoteError(RemoteErrorKind),
}

/// Time span covered by an export, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTimeRange {
    pub start: i64,
    pub end: i64,
}

/// Earliest known creation time to latest known last event time across `streams`.
///
/// Zero timestamps mean "unknown" and are ignored. Returns `None` when either bound has no
/// known value.
pub fn export_time_range(streams: &[LogStreamDescriptor]) -> Option<ExportTimeRange> {
    let start = streams
        .iter()
        .map(|stream| stream.creation_time)
        .filter(|time| *time > 0)
        .min()?;
    let end = streams
        .iter()
        .map(|stream| stream.last_event_time)
        .filter(|time| *time > 0)
        .max()?;
    Some(ExportTimeRange { start, end })
}

pub struct ExportTaskCreator {
    service: Arc<dyn LogsService>,
    destination_bucket: String,
}

impl ExportTaskCreator {
    pub fn new(service: Arc<dyn LogsService>, destination_bucket: impl Into<String>) -> Self {
        ExportTaskCreator {
            service,
            destination_bucket: destination_bucket.into(),
        }
    }

    /// Submits one export task covering `streams`.
    ///
    /// Service errors are classified and logged, and come back as a declined outcome. Only
    /// failures that never reached the service, or answers missing the task id, are returned
    /// as `Err`.
    pub async fn create(
        &self,
        log_group_name: &str,
        streams: &[LogStreamDescriptor],
    ) -> Result<ExportOutcome, LogsServiceError> {
        if streams.is_empty() {
            info!("No streams to export for log group: {log_group_name}");
            return Ok(ExportOutcome::DeclinedEmptyRange);
        }

        let Some(range) = export_time_range(streams) else {
            warn!("Invalid time range for {log_group_name}, skipping export");
            return Ok(ExportOutcome::DeclinedEmptyRange);
        };

        let request = ExportTaskRequest {
            log_group_name: log_group_name.to_string(),
            from_time: range.start,
            to_time: range.end,
            destination: self.destination_bucket.clone(),
            destination_prefix: destination_prefix(log_group_name, &Local::now()),
        };

        match self.service.create_export_task(&request).await {
            Ok(task_id) => {
                info!("Created export task {task_id} for {log_group_name}");
                info!(
                    "Destination: s3://{}/{}",
                    request.destination, request.destination_prefix
                );
                info!("Exporting {} streams", streams.len());
                Ok(ExportOutcome::Submitted(task_id))
            }
            Err(e) => {
                let Some(code) = e.code() else {
                    return Err(e);
                };
                let kind = RemoteErrorKind::from_code(code);
                match kind {
                    RemoteErrorKind::LimitExceeded => warn!(
                        "Export task limit exceeded for {log_group_name}. Will retry in next execution."
                    ),
                    RemoteErrorKind::AlreadyExists => {
                        warn!("Export task already exists for {log_group_name}")
                    }
                    RemoteErrorKind::InvalidParameter => {
                        error!("Invalid parameters for {log_group_name}: {e}")
                    }
                    RemoteErrorKind::Other => {
                        error!("Error creating export task for {log_group_name}: {e}")
                    }
                }
                Ok(ExportOutcome::DeclinedRemoteError(kind))
            }
        }
    }

    /// Current status of a submitted task; `Unknown` when the lookup fails or finds nothing.
    pub async fn check_status(&self, task_id: &str) -> ExportTaskStatus {
        match self.service.describe_export_task(task_id).await {
            Ok(Some(status)) => {
                debug!("Export task {task_id} status: {status}");
                status
            }
            Ok(None) => ExportTaskStatus::Unknown,
            Err(e) => {
                error!("Error checking export task {task_id}: {e}");
                ExportTaskStatus::Unknown
            }
        }
    }
}
