// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use logs_s3_exporter::{
    config::{self, ExporterConfig},
    handler::{self, InvocationContext},
    logger, CloudWatchLogsService, LogsService,
};

type LambdaError = lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    let log_level = config::log_level_from_env();
    if let Err(e) = logger::init(&log_level) {
        eprintln!("{}: {e}", logger::LOG_PREFIX);
    }
    debug!("Logging subsystem enabled");

    let service: Arc<dyn LogsService> = Arc::new(CloudWatchLogsService::from_env().await);

    let result = lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let service = Arc::clone(&service);
        async move { function(service, event).await }
    }))
    .await;

    if let Err(e) = &result {
        error!("Lambda runtime stopped: {e}");
    }
    result
}

async fn function(
    service: Arc<dyn LogsService>,
    event: LambdaEvent<Value>,
) -> Result<Value, LambdaError> {
    let (payload, context) = event.into_parts();
    let invocation = InvocationContext::new(
        context.env_config.function_name.clone(),
        context.request_id.clone(),
    );

    let response = handler::handle(service, ExporterConfig::from_env(), &payload, &invocation).await;
    Ok(serde_json::to_value(response)?)
}
