// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory log service for testing

use async_trait::async_trait;
use logs_s3_exporter::logs_service::{
    ExportTaskRequest, ExportTaskStatus, LogStreamDescriptor, LogsService, LogsServiceError, Page,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Scripted log service: groups and streams are served in insertion order, in pages of
/// `page_size`, with page tokens holding the offset of the next page.
#[derive(Default)]
pub struct MockLogsService {
    log_groups: Vec<String>,
    streams: HashMap<String, Vec<LogStreamDescriptor>>,
    page_size: Option<usize>,
    fail_group_listing: bool,
    failing_prefixes: HashSet<String>,
    failing_stream_groups: HashSet<String>,
    export_errors: HashMap<String, LogsServiceError>,
    task_statuses: HashMap<String, ExportTaskStatus>,
    /// Every export request received, in order
    pub export_requests: Mutex<Vec<ExportTaskRequest>>,
    /// Every (log group, token) stream listing call, in order
    pub stream_calls: Mutex<Vec<(String, Option<String>)>>,
}

#[allow(dead_code)]
impl MockLogsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_groups<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_groups.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_streams(mut self, log_group: &str, streams: Vec<LogStreamDescriptor>) -> Self {
        self.streams.insert(log_group.to_string(), streams);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn failing_group_listing(mut self) -> Self {
        self.fail_group_listing = true;
        self
    }

    pub fn failing_prefix(mut self, prefix: &str) -> Self {
        self.failing_prefixes.insert(prefix.to_string());
        self
    }

    pub fn failing_streams(mut self, log_group: &str) -> Self {
        self.failing_stream_groups.insert(log_group.to_string());
        self
    }

    pub fn failing_export(mut self, log_group: &str, error: LogsServiceError) -> Self {
        self.export_errors.insert(log_group.to_string(), error);
        self
    }

    pub fn with_task_status(mut self, task_id: &str, status: ExportTaskStatus) -> Self {
        self.task_statuses.insert(task_id.to_string(), status);
        self
    }

    pub fn export_requests(&self) -> Vec<ExportTaskRequest> {
        self.export_requests.lock().unwrap().clone()
    }

    pub fn stream_calls(&self) -> Vec<(String, Option<String>)> {
        self.stream_calls.lock().unwrap().clone()
    }

    fn page<T: Clone>(&self, items: &[T], next_token: Option<String>) -> Page<T> {
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = next_token
            .and_then(|token| token.parse::<usize>().ok())
            .unwrap_or(0);
        let end = (offset + page_size).min(items.len());
        let slice = items.get(offset..end).unwrap_or_default().to_vec();

        if end < items.len() {
            Page::with_next_token(slice, end.to_string())
        } else {
            Page::last(slice)
        }
    }
}

fn throttled() -> LogsServiceError {
    LogsServiceError::service("ThrottlingException", "Rate exceeded")
}

#[async_trait]
impl LogsService for MockLogsService {
    async fn describe_log_groups(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<String>, LogsServiceError> {
        match prefix {
            None if self.fail_group_listing => Err(throttled()),
            Some(prefix) if self.failing_prefixes.contains(prefix) => Err(throttled()),
            _ => {
                let matching: Vec<String> = self
                    .log_groups
                    .iter()
                    .filter(|name| prefix.map_or(true, |p| name.starts_with(p)))
                    .cloned()
                    .collect();
                Ok(self.page(&matching, next_token))
            }
        }
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamDescriptor>, LogsServiceError> {
        self.stream_calls
            .lock()
            .unwrap()
            .push((log_group_name.to_string(), next_token.clone()));

        if self.failing_stream_groups.contains(log_group_name) {
            return Err(LogsServiceError::service(
                "ResourceNotFoundException",
                "The specified log group does not exist.",
            ));
        }
        let streams = self
            .streams
            .get(log_group_name)
            .cloned()
            .unwrap_or_default();
        Ok(self.page(&streams, next_token))
    }

    async fn create_export_task(
        &self,
        request: &ExportTaskRequest,
    ) -> Result<String, LogsServiceError> {
        if let Some(error) = self.export_errors.get(&request.log_group_name) {
            return Err(error.clone());
        }
        let mut requests = self.export_requests.lock().unwrap();
        requests.push(request.clone());
        Ok(format!("task-{}", requests.len()))
    }

    async fn describe_export_task(
        &self,
        task_id: &str,
    ) -> Result<Option<ExportTaskStatus>, LogsServiceError> {
        if task_id == "broken" {
            return Err(LogsServiceError::Transport("connection reset".into()));
        }
        Ok(self.task_statuses.get(task_id).copied())
    }
}
