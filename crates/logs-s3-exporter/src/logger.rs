// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log output for the exporter.
//!
//! Lines are prefixed with `LOGS_S3_EXPORTER` so they stand out among the function's other
//! CloudWatch output:
//!
//! ```text
//! LOGS_S3_EXPORTER | INFO | Found 12 old streams in /aws/lambda/orders
//! LOGS_S3_EXPORTER | WARN | Export task limit exceeded for /aws/lambda/orders. Will retry in next execution.
//! ```
//!
//! No timestamp is written; CloudWatch Logs stamps every line on ingestion.

use std::fmt;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::error::ExporterError;

pub const LOG_PREFIX: &str = "LOGS_S3_EXPORTER";

#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(&mut writer, "{LOG_PREFIX} | {} | ", event.metadata().level())?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Filter directives for `log_level`, keeping the AWS SDK stack quiet.
pub fn env_filter_directives(log_level: &str) -> String {
    format!("aws_config=warn,aws_smithy_runtime=warn,hyper=off,h2=off,rustls=off,{log_level}")
}

/// Installs the global subscriber. Call once, at process start.
pub fn init(log_level: &str) -> Result<(), ExporterError> {
    let env_filter = EnvFilter::try_new(env_filter_directives(log_level))
        .map_err(|e| ExporterError::InvalidConfig(format!("could not parse log level: {e}")))?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .event_format(Formatter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ExporterError::Runtime(format!("setting default subscriber failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_directives_parse() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let directives = env_filter_directives(level);
            assert!(directives.ends_with(level));
            assert!(EnvFilter::try_new(directives).is_ok());
        }
    }

    #[test]
    fn test_formatter_prefixes_lines() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .event_format(Formatter)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Export task already exists for /app/a");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            output,
            "LOGS_S3_EXPORTER | WARN | Export task already exists for /app/a\n"
        );
    }
}
