use error_stack::ResultExt;
use mood_tracker_core::adapters::config::web_config::TelemetryConfig;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{self as sdktrace, Tracer};
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing::Level;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{filter::Targets, layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::prettyprint::PrettyFormatter;

pub const LOG_FILE: &str = "mood_tracker.log";
const SERVICE_NAME: &str = "mood_tracker_web";

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to create the log file")]
    LogFile,
    #[error("Failed to install the OTLP trace pipeline")]
    Otlp,
    #[error("A global tracing subscriber is already installed")]
    Subscriber,
}

/// Workspace crates log at TRACE in debug mode, INFO otherwise.
pub fn targets(debug: bool) -> Targets {
    let (level, http_level) = if debug {
        (Level::TRACE, Level::DEBUG)
    } else {
        (Level::INFO, Level::INFO)
    };

    Targets::new()
        .with_target("mood_tracker_web", level)
        .with_target("mood_tracker_core", level)
        .with_target("tower_http", http_level)
}

pub fn setup_tracing(config: &TelemetryConfig) -> error_stack::Result<(), TelemetryError> {
    let stdout_layer = tracing_subscriber::fmt::layer().event_format(PrettyFormatter::new(config.debug));

    let log_file = std::fs::File::create(LOG_FILE)
        .change_context(TelemetryError::LogFile)
        .attach_printable_lazy(|| format!("Path: {LOG_FILE}"))?;
    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(log_file)
        .with_ansi(false);

    let otel_layer = match &config.otlp_endpoint {
        Some(endpoint) => Some(OpenTelemetryLayer::new(otlp_tracer(endpoint)?)),
        None => None,
    };

    Registry::default()
        .with(targets(config.debug))
        .with(otel_layer)
        .with(log_file_layer)
        .with(stdout_layer)
        .try_init()
        .change_context(TelemetryError::Subscriber)?;

    Ok(())
}

fn otlp_tracer(endpoint: &str) -> error_stack::Result<Tracer, TelemetryError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", SERVICE_NAME),
        ])))
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .change_context(TelemetryError::Otlp)
        .attach_printable_lazy(|| format!("Endpoint: {endpoint}"))
}

pub fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
        opentelemetry::global::shutdown_tracer_provider();
    }));
}

/// Flushes pending spans. Does nothing when no OTLP pipeline was installed.
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}
