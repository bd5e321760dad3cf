// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::logs_service::LogsServiceError;

/// Errors that abort a whole invocation.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    #[error("{0}")]
    InvalidConfig(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Service(#[from] LogsServiceError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ExporterError {
    /// Stable name of the error class, reported alongside the message in failure responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ExporterError::InvalidConfig(_) => "InvalidConfig",
            ExporterError::InvalidInput(_) => "InvalidInput",
            ExporterError::Service(_) => "ServiceError",
            ExporterError::Runtime(_) => "RuntimeError",
        }
    }
}
