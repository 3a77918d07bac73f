mod config;

use std::sync::Arc;

use clap::Parser;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use relay_api::{HttpApi, JobServiceAdapter};
use relay_core::{Dispatcher, EntryStore, Janitor, JobService, MetricsHandle};
use relay_observe::init_logger;
use relay_prometheus::PrometheusMetrics;
use relay_provider::DeploymentProvider;

use crate::config::{AgentConfig, CliArgs};

fn main() -> anyhow::Result<()> {
    // 1) config
    dotenvy::dotenv().ok();
    let config = AgentConfig::try_from(CliArgs::parse())?;

    // 2) logger; local offset detection needs a single-threaded process
    init_logger(&config.logger)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: AgentConfig) -> anyhow::Result<()> {
    info!(
        addr = %config.addr,
        deployment = %config.provider.deployment_key,
        environment = %config.provider.environment,
        "relay-agentd starting"
    );

    // 3) metrics
    let metrics = PrometheusMetrics::new()?;
    let metrics_handle: MetricsHandle = Arc::new(metrics.clone());

    // 4) store + dispatcher
    let provider = DeploymentProvider::new(config.provider.clone())?;
    let store = Arc::new(EntryStore::new());
    let dispatcher = Dispatcher::new(Arc::clone(&store), Arc::new(provider))
        .with_metrics(Arc::clone(&metrics_handle))
        .with_timeout(config.job_timeout);

    // 5) janitor
    let root = CancellationToken::new();
    let janitor = Janitor::new(Arc::clone(&store), config.janitor)
        .with_metrics(metrics_handle)
        .spawn(root.child_token());

    // 6) http
    let service = Arc::new(JobService::new(store, dispatcher));
    let adapter = JobServiceAdapter::new(Arc::clone(&service)).with_prometheus(metrics);
    let router = HttpApi::new(Arc::new(adapter)).router();

    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7) teardown
    root.cancel();
    janitor.shutdown().await?;

    let in_flight = service.stats().in_flight;
    if in_flight > 0 {
        info!(in_flight, grace = ?config.shutdown_grace, "waiting for in-flight jobs");
    }
    if !service.dispatcher().drain(config.shutdown_grace).await {
        warn!(
            abandoned = service.stats().in_flight,
            "shutdown grace elapsed with jobs still running"
        );
    }

    info!("relay-agentd stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }

    info!("shutdown signal received, draining");
}
