//! # desim-cli::logging
//!
//! A formatter that prefixes each log line with simulation time (read off
//! an `at` field on the event, when present) in addition to the usual
//! wall-clock elapsed time and level.

use crate::args::LogFormat;
use std::fmt;
use std::path::Path;
use tracing::field::Field;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub fn init(format: LogFormat, log_file: Option<&Path>) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let writer: Box<dyn Fn() -> Box<dyn std::io::Write> + Send + Sync> = match log_file {
        Some(path) => {
            let path = path.to_path_buf();
            Box::new(move || {
                Box::new(
                    std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&path)
                        .expect("failed to open log file"),
                )
            })
        }
        None => Box::new(|| Box::new(std::io::stderr())),
    };

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .init();
        }
        LogFormat::Human => {
            tracing_subscriber::fmt()
                .event_format(SimTimeFormatter::new())
                .with_env_filter(env_filter)
                .with_writer(writer)
                .init();
        }
    }
}

/// Extracts a `SimTime` nanosecond count into a human-scaled string, e.g.
/// `1.5ms` rather than `1500000ns`.
fn format_sim_time(sim_time_ns: u128) -> String {
    if sim_time_ns < 1_000 {
        format!("{sim_time_ns}ns")
    } else if sim_time_ns < 1_000_000 {
        format!("{:.1}us", sim_time_ns as f64 / 1_000.0)
    } else if sim_time_ns < 1_000_000_000 {
        format!("{:.1}ms", sim_time_ns as f64 / 1_000_000.0)
    } else {
        format!("{:.1}s", sim_time_ns as f64 / 1_000_000_000.0)
    }
}

#[derive(Default)]
struct SimTimeExtractor {
    at: Option<u128>,
}

impl tracing::field::Visit for SimTimeExtractor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "at" {
            self.at = Some(value as u128);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "at" && value >= 0 {
            self.at = Some(value as u128);
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

pub struct SimTimeFormatter {
    started: std::time::Instant,
}

impl SimTimeFormatter {
    pub fn new() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for SimTimeFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        write!(writer, "[{:>8.3}s] ", self.started.elapsed().as_secs_f64())?;

        let mut extractor = SimTimeExtractor::default();
        event.record(&mut extractor);
        if let Some(at) = extractor.at {
            write!(writer, "(sim {}) ", format_sim_time(at))?;
        }

        write!(writer, "[{:>5}] ", metadata.level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
