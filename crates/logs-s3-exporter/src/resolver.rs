// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::logs_service::{LogsService, LogsServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Exact,
    PrefixOnly,
    Missing,
}

/// Decides which log groups a run works on.
pub struct LogGroupResolver {
    service: Arc<dyn LogsService>,
}

impl LogGroupResolver {
    pub fn new(service: Arc<dyn LogsService>) -> Self {
        LogGroupResolver { service }
    }

    /// Returns the requested groups that exist, in request order, or every group the service
    /// knows when no names are requested. An empty request counts as no request.
    pub async fn resolve(&self, requested: Option<&[String]>) -> Vec<String> {
        match requested {
            Some(names) if !names.is_empty() => self.resolve_named(names).await,
            _ => self.all_log_groups().await,
        }
    }

    async fn all_log_groups(&self) -> Vec<String> {
        let mut log_groups = Vec::new();
        let mut next_token = None;

        loop {
            match self.service.describe_log_groups(None, next_token).await {
                Ok(page) => {
                    log_groups.extend(page.items);
                    match page.next_token {
                        Some(token) => next_token = Some(token),
                        None => break,
                    }
                }
                Err(e) => {
                    error!("Error listing log groups: {e}");
                    return Vec::new();
                }
            }
        }

        info!("Found {} total log groups", log_groups.len());
        log_groups
    }

    async fn resolve_named(&self, names: &[String]) -> Vec<String> {
        let mut valid_groups = Vec::with_capacity(names.len());

        for name in names {
            match self.lookup(name).await {
                Ok(Lookup::Exact) => valid_groups.push(name.clone()),
                Ok(Lookup::PrefixOnly) => {
                    warn!("Exact match not found for log group: {name}");
                }
                Ok(Lookup::Missing) => warn!("Log group not found: {name}"),
                Err(e) => error!("Error checking log group {name}: {e}"),
            }
        }

        info!(
            "Found {} valid log groups from specified list",
            valid_groups.len()
        );
        valid_groups
    }

    // A prefix query may return siblings such as `/app/foo-bar` for `/app/foo`, so the
    // candidates are scanned for the exact name across pages.
    async fn lookup(&self, name: &str) -> Result<Lookup, LogsServiceError> {
        let mut seen_candidates = false;
        let mut next_token = None;

        loop {
            let page = self
                .service
                .describe_log_groups(Some(name), next_token)
                .await?;
            if page.items.iter().any(|candidate| candidate == name) {
                return Ok(Lookup::Exact);
            }
            seen_candidates |= !page.items.is_empty();

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        if seen_candidates {
            Ok(Lookup::PrefixOnly)
        } else {
            Ok(Lookup::Missing)
        }
    }
}
