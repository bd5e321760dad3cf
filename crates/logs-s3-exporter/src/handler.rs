// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Invocation payload parsing and response building.
//!
//! Accepted events, first match wins:
//!
//! ```text
//! {"log_groups": ["/aws/lambda/a", "/aws/lambda/b"]}   explicit list
//! {"log_group": "/aws/lambda/a"}                       single group
//! {}                                                   every log group
//! ```

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ExporterConfig;
use crate::error::ExporterError;
use crate::logs_service::LogsService;
use crate::orchestrator::{RunOrchestrator, RunResult};

const REDACTED_KEYS: [&str; 3] = ["password", "secret", "token"];
const SUCCESS_MESSAGE: &str = "CloudWatch logs export process completed successfully";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationRequest {
    AllLogGroups,
    LogGroups(Vec<String>),
}

impl InvocationRequest {
    pub fn from_event(event: &Value) -> Result<Self, ExporterError> {
        if let Some(value) = event.get("log_groups") {
            let names = value
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| {
                    ExporterError::InvalidInput(
                        "'log_groups' must be a list of strings".to_string(),
                    )
                })?;
            info!("Processing specific log groups: {names:?}");
            return Ok(InvocationRequest::LogGroups(names));
        }

        if let Some(value) = event.get("log_group") {
            let name = value.as_str().ok_or_else(|| {
                ExporterError::InvalidInput("'log_group' must be a string".to_string())
            })?;
            info!("Processing single log group: {name}");
            return Ok(InvocationRequest::LogGroups(vec![name.to_string()]));
        }

        info!("Processing all available log groups");
        Ok(InvocationRequest::AllLogGroups)
    }

    pub fn log_group_names(&self) -> Option<&[String]> {
        match self {
            InvocationRequest::AllLogGroups => None,
            InvocationRequest::LogGroups(names) => Some(names),
        }
    }
}

/// Copy of the event without credential-looking top-level keys, for logging.
pub fn redact_event(event: &Value) -> Value {
    match event {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| !REDACTED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub function_name: String,
    pub request_id: Option<String>,
}

impl InvocationContext {
    pub fn new(function_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        InvocationContext {
            function_name: function_name.into(),
            request_id: Some(request_id.into()),
        }
    }

    fn request_id(&self) -> String {
        self.request_id
            .clone()
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationSummary {
    pub s3_bucket: String,
    pub days_threshold: u32,
    pub function_name: String,
    pub aws_request_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessBody {
    pub message: String,
    pub results: RunResult,
    pub configuration: ConfigurationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureBody {
    pub error: String,
    pub error_type: String,
    pub aws_request_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(Box<SuccessBody>),
    Failure(FailureBody),
}

#[derive(Debug, Clone, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

/// Handles one invocation. Failures are reported in the response, never as `Err`.
pub async fn handle(
    service: Arc<dyn LogsService>,
    config: Result<ExporterConfig, ExporterError>,
    event: &Value,
    context: &InvocationContext,
) -> InvocationResponse {
    info!("Received event: {}", redact_event(event));

    match run(service, config, event, context).await {
        Ok(body) => {
            info!("Lambda execution completed successfully");
            InvocationResponse {
                status_code: 200,
                body: ResponseBody::Success(Box::new(body)),
            }
        }
        Err(e) => {
            let message = format!("Lambda execution failed: {e}");
            error!("{message}");
            InvocationResponse {
                status_code: 500,
                body: ResponseBody::Failure(FailureBody {
                    error: message,
                    error_type: e.kind().to_string(),
                    aws_request_id: context.request_id(),
                }),
            }
        }
    }
}

async fn run(
    service: Arc<dyn LogsService>,
    config: Result<ExporterConfig, ExporterError>,
    event: &Value,
    context: &InvocationContext,
) -> Result<SuccessBody, ExporterError> {
    let config = config?;
    let request = InvocationRequest::from_event(event)?;

    let orchestrator = RunOrchestrator::new(service, &config);
    let results = orchestrator.run(request.log_group_names()).await;

    Ok(SuccessBody {
        message: SUCCESS_MESSAGE.to_string(),
        results,
        configuration: ConfigurationSummary {
            s3_bucket: config.s3_bucket,
            days_threshold: config.days_threshold,
            function_name: context.function_name.clone(),
            aws_request_id: context.request_id(),
        },
    })
}
