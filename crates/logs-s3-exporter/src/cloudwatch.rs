// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! [`LogsService`] backed by the AWS CloudWatch Logs API.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use cloudwatchlogs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use cloudwatchlogs::types::OrderBy;
use tracing::debug;

use crate::logs_service::{
    ExportTaskRequest, ExportTaskStatus, LogStreamDescriptor, LogsService, LogsServiceError, Page,
};

#[derive(Debug, Clone)]
pub struct CloudWatchLogsService {
    client: cloudwatchlogs::Client,
}

impl CloudWatchLogsService {
    pub fn new(client: cloudwatchlogs::Client) -> Self {
        CloudWatchLogsService { client }
    }

    /// Builds a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        debug!(
            "Loaded AWS configuration for region {:?}",
            aws_config.region()
        );
        CloudWatchLogsService::new(cloudwatchlogs::Client::new(&aws_config))
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> LogsServiceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_error) = err.as_service_error() {
        return LogsServiceError::Service {
            code: service_error.code().unwrap_or("Unknown").to_string(),
            message: service_error.message().unwrap_or_default().to_string(),
        };
    }
    LogsServiceError::Transport(DisplayErrorContext(&err).to_string())
}

// An empty token is returned by some endpoints on the last page.
fn next_page_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

#[async_trait]
impl LogsService for CloudWatchLogsService {
    async fn describe_log_groups(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<String>, LogsServiceError> {
        let response = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(prefix.map(str::to_string))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let items = response
            .log_groups
            .unwrap_or_default()
            .into_iter()
            .filter_map(|group| group.log_group_name)
            .collect();

        Ok(Page {
            items,
            next_token: next_page_token(response.next_token),
        })
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamDescriptor>, LogsServiceError> {
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(log_group_name)
            .order_by(OrderBy::LastEventTime)
            .descending(false)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let items = response
            .log_streams
            .unwrap_or_default()
            .into_iter()
            .filter_map(|stream| {
                Some(LogStreamDescriptor {
                    name: stream.log_stream_name?,
                    last_event_time: stream.last_event_timestamp.unwrap_or(0),
                    creation_time: stream.creation_time.unwrap_or(0),
                    last_ingestion_time: stream.last_ingestion_time.unwrap_or(0),
                })
            })
            .collect();

        Ok(Page {
            items,
            next_token: next_page_token(response.next_token),
        })
    }

    async fn create_export_task(
        &self,
        request: &ExportTaskRequest,
    ) -> Result<String, LogsServiceError> {
        let response = self
            .client
            .create_export_task()
            .log_group_name(&request.log_group_name)
            .from(request.from_time)
            .to(request.to_time)
            .destination(&request.destination)
            .destination_prefix(&request.destination_prefix)
            .send()
            .await
            .map_err(map_sdk_error)?;

        response.task_id.ok_or_else(|| {
            LogsServiceError::MalformedResponse(format!(
                "CreateExportTask returned no task id for {}",
                request.log_group_name
            ))
        })
    }

    async fn describe_export_task(
        &self,
        task_id: &str,
    ) -> Result<Option<ExportTaskStatus>, LogsServiceError> {
        let response = self
            .client
            .describe_export_tasks()
            .task_id(task_id)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let status = response
            .export_tasks
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|task| {
                task.status
                    .and_then(|status| status.code)
                    .map(|code| ExportTaskStatus::from_code(code.as_str()))
                    .unwrap_or(ExportTaskStatus::Unknown)
            });

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_page_token_drops_empty_tokens() {
        assert_eq!(next_page_token(None), None);
        assert_eq!(next_page_token(Some(String::new())), None);
        assert_eq!(
            next_page_token(Some("abc".to_string())),
            Some("abc".to_string())
        );
    }
}
