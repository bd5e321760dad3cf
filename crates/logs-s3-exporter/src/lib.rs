// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Exports inactive CloudWatch log streams to S3.
//!
//! A run resolves the target log groups, selects the streams of each group whose last event
//! is older than the configured threshold and submits one CloudWatch Logs export task per
//! group. The export itself is performed asynchronously by CloudWatch Logs; a run only
//! submits the tasks and reports what it did.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod cloudwatch;
pub mod config;
pub mod error;
pub mod export;
pub mod handler;
pub mod logger;
pub mod logs_service;
pub mod orchestrator;
pub mod prefix;
pub mod resolver;
pub mod stream_filter;

pub use cloudwatch::CloudWatchLogsService;
pub use config::ExporterConfig;
pub use error::ExporterError;
pub use logs_service::{LogsService, LogsServiceError};
pub use orchestrator::{RunOrchestrator, RunResult};
