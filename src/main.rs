//! Listing intake HTTP service.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use listing_intake::adapters::generation::TemplateListingGenerator;
use listing_intake::adapters::http::{app_router, IntakeHandlers, ReportHandlers};
use listing_intake::adapters::records::InMemoryRecordSink;
use listing_intake::adapters::session::InMemorySessionStore;
use listing_intake::adapters::vision::{HttpVisionAnalyzer, HttpVisionConfig, MockVisionAnalyzer};
use listing_intake::application::{
    GenerateReportHandler, HandleInboundEventHandler, PruneSessionsHandler,
};
use listing_intake::config::{AppConfig, ServerConfig, VisionConfig};
use listing_intake::ports::{RecordSink, SessionStore, VisionAnalyzer};

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if server.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn vision_analyzer(
    config: &VisionConfig,
) -> Result<Arc<dyn VisionAnalyzer>, Box<dyn std::error::Error>> {
    match (&config.endpoint, &config.api_key) {
        (Some(endpoint), Some(api_key)) if config.has_endpoint() => {
            let http = HttpVisionConfig::new(api_key.clone(), endpoint.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            info!(endpoint = %endpoint, "using HTTP vision analyzer");
            Ok(Arc::new(HttpVisionAnalyzer::new(http)?))
        }
        _ => {
            tracing::warn!("no vision endpoint configured, using mock analyzer");
            Ok(Arc::new(MockVisionAnalyzer::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        session_timeout_minutes = config.session.timeout_minutes,
        "starting listing intake"
    );

    let store = InMemorySessionStore::new(config.session.timeout());
    let sessions: Arc<dyn SessionStore> = Arc::new(store);
    let policy = config.pricing.policy();
    let records: Arc<dyn RecordSink> = Arc::new(InMemoryRecordSink::new(policy));

    let event_handler = HandleInboundEventHandler::new(
        sessions.clone(),
        vision_analyzer(&config.vision)?,
        Arc::new(TemplateListingGenerator::new(policy)),
        records.clone(),
    );
    let report_handler = GenerateReportHandler::new(records, config.report.generator()?);

    let pruner =
        PruneSessionsHandler::new(sessions).spawn(config.session.prune_interval());

    let app = app_router(
        IntakeHandlers::new(Arc::new(event_handler)),
        ReportHandlers::new(Arc::new(report_handler)),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pruner.abort();
    info!("shutdown complete");
    Ok(())
}
