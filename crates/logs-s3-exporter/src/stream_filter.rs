// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::logs_service::{LogStreamDescriptor, LogsService, LogsServiceError};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Epoch milliseconds before which a stream's last event must fall for it to be exported.
pub fn cutoff_millis(now_millis: i64, threshold_days: u32) -> i64 {
    now_millis - i64::from(threshold_days) * MILLIS_PER_DAY
}

/// Takes the leading streams of a page whose last event precedes `cutoff`.
///
/// Pages are sorted by last event time, so the first stream at or past the cutoff ends the
/// page. Later streams are never selected even if their own timestamp is older.
pub fn select_from_page(
    streams: Vec<LogStreamDescriptor>,
    cutoff: i64,
) -> Vec<LogStreamDescriptor> {
    streams
        .into_iter()
        .take_while(|stream| stream.last_event_time < cutoff)
        .collect()
}

/// Finds the streams of a log group that have been idle for longer than the threshold.
pub struct StreamAgeFilter {
    service: Arc<dyn LogsService>,
    threshold_days: u32,
}

impl StreamAgeFilter {
    pub fn new(service: Arc<dyn LogsService>, threshold_days: u32) -> Self {
        StreamAgeFilter {
            service,
            threshold_days,
        }
    }

    pub async fn streams_to_export(&self, log_group_name: &str) -> Vec<LogStreamDescriptor> {
        let cutoff = cutoff_millis(Utc::now().timestamp_millis(), self.threshold_days);
        self.streams_before(log_group_name, cutoff).await
    }

    /// Same as [`Self::streams_to_export`] with an explicit cutoff.
    ///
    /// A listing failure is logged and yields no streams for the group.
    pub async fn streams_before(
        &self,
        log_group_name: &str,
        cutoff: i64,
    ) -> Vec<LogStreamDescriptor> {
        debug!(
            "Cutoff timestamp for {}: {} ({})",
            log_group_name,
            cutoff,
            Utc.timestamp_millis_opt(cutoff)
                .single()
                .map(|at| at.to_rfc3339())
                .unwrap_or_default()
        );

        match self.scan(log_group_name, cutoff).await {
            Ok(streams) => {
                info!("Found {} old streams in {}", streams.len(), log_group_name);
                streams
            }
            Err(e) => {
                error!("Error getting log streams for {log_group_name}: {e}");
                Vec::new()
            }
        }
    }

    async fn scan(
        &self,
        log_group_name: &str,
        cutoff: i64,
    ) -> Result<Vec<LogStreamDescriptor>, LogsServiceError> {
        let mut selected = Vec::new();
        let mut next_token = None;

        loop {
            let page = self
                .service
                .describe_log_streams(log_group_name, next_token)
                .await?;
            selected.extend(select_from_page(page.items, cutoff));

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(selected)
    }
}
