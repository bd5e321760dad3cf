// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helper functions for integration tests

use chrono::Utc;
use logs_s3_exporter::logs_service::LogStreamDescriptor;
use logs_s3_exporter::stream_filter::MILLIS_PER_DAY;

/// Epoch milliseconds `days` days before now.
pub fn days_ago(days: i64) -> i64 {
    Utc::now().timestamp_millis() - days * MILLIS_PER_DAY
}

/// A stream created a day before its last event.
pub fn stream(name: &str, last_event_time: i64) -> LogStreamDescriptor {
    LogStreamDescriptor {
        name: name.to_string(),
        last_event_time,
        creation_time: last_event_time - MILLIS_PER_DAY,
        last_ingestion_time: last_event_time,
    }
}

/// `count` streams idle for ten days or more, oldest first.
pub fn old_streams(prefix: &str, count: usize) -> Vec<LogStreamDescriptor> {
    (0..count)
        .rev()
        .map(|i| stream(&format!("{prefix}-{i}"), days_ago(10 + i as i64)))
        .collect()
}
