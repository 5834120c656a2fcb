use error_stack::ResultExt;
use mood_tracker_core::adapters::config::app_config::AppConfig;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

mod application_service_factory;
mod error;
mod prettyprint;
mod telemetry;
mod web_adapter;

use application_service_factory::ApplicationServiceFactory;
use error::ServerError;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(report) => {
            eprintln!("Invalid configuration: {report:?}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(report) = telemetry::setup_tracing(&config.telemetry) {
        eprintln!("Failed to set up tracing: {report:?}");
        return ExitCode::FAILURE;
    }
    telemetry::setup_panic_hook();

    info!(debug = config.telemetry.debug, "Starting mood tracker");

    let result = run(&config).await;
    telemetry::shutdown();

    match result {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(report) => {
            error!("Server failed: {report:?}");
            ExitCode::FAILURE
        }
    }
}

#[instrument(skip(config))]
async fn run(config: &AppConfig) -> error_stack::Result<(), ServerError> {
    let app_service = ApplicationServiceFactory::create(config)
        .await
        .change_context(ServerError::Startup)?;
    let app = web_adapter::router(app_service);

    let addr = config.web.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .change_context(ServerError::Bind)
        .attach_printable_lazy(|| format!("Address: {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .change_context(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
