// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! S3 key prefixes for export destinations.
//!
//! Every export lands under `<sanitized log group>/<run timestamp>`, so repeated runs for the
//! same group end up in sibling folders. The timestamp has second resolution; two exports of
//! the same group within one second share a prefix.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Turns a log group name into a single S3 path segment.
///
/// Leading slashes are removed, slashes and spaces become underscores, and anything other
/// than ASCII alphanumerics, `-`, `_` and `.` is dropped.
///
/// # Examples
///
/// ```
/// use logs_s3_exporter::prefix::sanitize_log_group_name;
///
/// assert_eq!(sanitize_log_group_name("/aws/lambda/my-function"), "aws_lambda_my-function");
/// assert_eq!(sanitize_log_group_name("my group:prod"), "my_groupprod");
/// ```
pub fn sanitize_log_group_name(log_group_name: &str) -> String {
    log_group_name
        .trim_start_matches('/')
        .chars()
        .map(|ch| if ch == '/' || ch == ' ' { '_' } else { ch })
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        .collect()
}

pub fn destination_prefix<Tz>(log_group_name: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}/{}",
        sanitize_log_group_name(log_group_name),
        at.format(TIMESTAMP_FORMAT)
    )
}
