// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Drives one export run over all resolved log groups.
//!
//! Groups are processed one after the other. Each ends in one of three ways:
//!
//! - exported: an export task was created
//! - skipped: no stream was old enough, or task creation was declined
//! - errored: an unexpected failure, recorded in [`RunResult::errors`]
//!
//! No group can abort the run.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ExporterConfig;
use crate::export::{ExportOutcome, ExportTaskCreator};
use crate::error::ExporterError;
use crate::logs_service::{ExportTaskStatus, LogsService};
use crate::resolver::LogGroupResolver;
use crate::stream_filter::StreamAgeFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTaskRecord {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "logGroupName")]
    pub log_group_name: String,
    #[serde(rename = "streamsCount")]
    pub streams_count: usize,
    /// Always `Running` at creation; a run does not follow tasks to completion.
    pub status: ExportTaskStatus,
}

/// Statistics of one run.
///
/// `processed_log_groups` also counts groups that ended in an error, so it is not the sum of
/// exported and skipped groups.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub processed_log_groups: usize,
    pub created_export_tasks: usize,
    pub skipped_log_groups: usize,
    pub export_tasks: Vec<ExportTaskRecord>,
    pub errors: Vec<String>,
    pub start_time: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    pub total_streams_processed: usize,
}

impl RunResult {
    pub fn new(start_time: DateTime<Local>) -> Self {
        RunResult {
            processed_log_groups: 0,
            created_export_tasks: 0,
            skipped_log_groups: 0,
            export_tasks: Vec::new(),
            errors: Vec::new(),
            start_time,
            end_time: None,
            duration_seconds: None,
            total_streams_processed: 0,
        }
    }

    fn record_export(&mut self, record: ExportTaskRecord) {
        self.created_export_tasks += 1;
        self.processed_log_groups += 1;
        self.export_tasks.push(record);
    }

    fn record_skip(&mut self) {
        self.skipped_log_groups += 1;
        self.processed_log_groups += 1;
    }

    fn record_error(&mut self, message: String) {
        self.processed_log_groups += 1;
        self.errors.push(message);
    }

    fn finish(&mut self, end_time: DateTime<Local>) {
        let elapsed = end_time.signed_duration_since(self.start_time);
        let micros = elapsed.num_microseconds().unwrap_or(i64::MAX);
        self.duration_seconds = Some(micros as f64 / 1_000_000.0);
        self.end_time = Some(end_time);
    }
}

enum GroupOutcome {
    Exported(ExportTaskRecord),
    Skipped,
}

pub struct RunOrchestrator {
    resolver: LogGroupResolver,
    filter: StreamAgeFilter,
    creator: ExportTaskCreator,
}

impl RunOrchestrator {
    pub fn new(service: Arc<dyn LogsService>, config: &ExporterConfig) -> Self {
        RunOrchestrator {
            resolver: LogGroupResolver::new(Arc::clone(&service)),
            filter: StreamAgeFilter::new(Arc::clone(&service), config.days_threshold),
            creator: ExportTaskCreator::new(service, config.s3_bucket.clone()),
        }
    }

    /// Runs the export for the requested groups, or for all groups when `requested` is
    /// `None` or empty.
    pub async fn run(&self, requested: Option<&[String]>) -> RunResult {
        let mut result = RunResult::new(Local::now());

        let log_groups = self.resolver.resolve(requested).await;
        if log_groups.is_empty() {
            warn!("No log groups found to process");
            result.finish(Local::now());
            return result;
        }

        let total = log_groups.len();
        info!("Starting processing of {total} log groups");

        for (index, log_group_name) in log_groups.iter().enumerate() {
            info!(
                "Processing log group {}/{}: {}",
                index + 1,
                total,
                log_group_name
            );

            match self.process_log_group(log_group_name, &mut result).await {
                Ok(GroupOutcome::Exported(record)) => result.record_export(record),
                Ok(GroupOutcome::Skipped) => result.record_skip(),
                Err(e) => {
                    let message = format!("Error processing log group {log_group_name}: {e}");
                    error!("{message}");
                    result.record_error(message);
                }
            }
        }

        result.finish(Local::now());

        info!(
            "Processing completed in {:.2} seconds",
            result.duration_seconds.unwrap_or_default()
        );
        info!(
            "Summary: {} processed, {} exported, {} skipped, {} errors",
            result.processed_log_groups,
            result.created_export_tasks,
            result.skipped_log_groups,
            result.errors.len()
        );

        result
    }

    async fn process_log_group(
        &self,
        log_group_name: &str,
        result: &mut RunResult,
    ) -> Result<GroupOutcome, ExporterError> {
        let streams = self.filter.streams_to_export(log_group_name).await;
        result.total_streams_processed += streams.len();

        if streams.is_empty() {
            info!("No old streams found in {log_group_name}");
            return Ok(GroupOutcome::Skipped);
        }

        match self.creator.create(log_group_name, &streams).await? {
            ExportOutcome::Submitted(task_id) => Ok(GroupOutcome::Exported(ExportTaskRecord {
                task_id,
                log_group_name: log_group_name.to_string(),
                streams_count: streams.len(),
                status: ExportTaskStatus::Running,
            })),
            ExportOutcome::DeclinedEmptyRange | ExportOutcome::DeclinedRemoteError(_) => {
                Ok(GroupOutcome::Skipped)
            }
        }
    }
}
