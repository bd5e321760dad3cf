// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ExporterError;
use std::env;
use tracing::info;

pub const DEFAULT_DAYS_THRESHOLD: u32 = 3;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration of the exporter, read from the environment once per process or invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Bucket the export tasks write to
    pub s3_bucket: String,
    /// Streams whose last event is older than this many days are exported
    pub days_threshold: u32,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            s3_bucket: String::new(),
            days_threshold: DEFAULT_DAYS_THRESHOLD,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ExporterConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ExporterError> {
        let s3_bucket = env::var("S3_BUCKET_NAME").unwrap_or_default();

        let days_threshold = match env::var("DAYS_THRESHOLD") {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ExporterError::InvalidConfig(format!(
                    "DAYS_THRESHOLD must be a non-negative number of days, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_DAYS_THRESHOLD,
        };

        let log_level = log_level_from_env();

        let config = Self {
            s3_bucket,
            days_threshold,
            log_level,
        };

        config.validate()?;
        info!(
            "Initialized exporter with bucket: {}, threshold: {} days",
            config.s3_bucket, config.days_threshold
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExporterError> {
        if self.s3_bucket.trim().is_empty() {
            return Err(ExporterError::InvalidConfig(
                "S3_BUCKET_NAME environment variable is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads `LOG_LEVEL`, falling back to `info` when unset.
pub fn log_level_from_env() -> String {
    env::var("LOG_LEVEL")
        .map(|val| normalize_log_level(&val).to_string())
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
}

/// Maps a user supplied level name onto a tracing level name. Unknown names become `info`.
pub fn normalize_log_level(raw: &str) -> &'static str {
    match raw.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        _ => DEFAULT_LOG_LEVEL,
    }
}
