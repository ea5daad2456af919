use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use pulumiservice_exporter::{
    Exporter, Metrics, ServiceClient, ServiceOpts, config, scrapers, server, util,
};

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// Responsibilities:
// - Parse flags (including generated --collect.<name> flags)
// - Initialize logging
// - Initialize the rustls crypto backend
// - Build the client, metrics bundle and exporter
// - Serve HTTP until Ctrl+C / SIGTERM
//
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let registry = scrapers::registry();
    let (cli, enabled) = config::parse_args(&registry);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    // Must happen before the reqwest client is built.
    if !util::install_crypto_provider() {
        warn!("rustls CryptoProvider was already installed");
    }

    info!("Starting {} {} ({})", util::NAME, util::VERSION, util::target());

    cli.validate()?;
    let opts = ServiceOpts::from_cli(&cli)?;
    let client = ServiceClient::new(opts).context("Error starting collector")?;

    for scraper in &enabled {
        info!("Scraper enabled: {}", scraper.name());
    }

    let exporter = Arc::new(
        Exporter::new(client, Metrics::new()?, enabled).context("Error starting collector")?,
    );

    let app = server::create_router(exporter, &cli.telemetry_path);

    let listener = tokio::net::TcpListener::bind(&cli.listen_address)
        .await
        .with_context(|| format!("Error starting HTTP server on {}", cli.listen_address))?;

    info!(
        "Listening on http://{}{}",
        listener.local_addr()?,
        cli.telemetry_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

// ------------------------------------------------------------
// Shutdown signal
// ------------------------------------------------------------
//
// Resolves on Ctrl+C, or SIGTERM on unix. In-flight scrapes are
// allowed to finish by axum's graceful shutdown.
//
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl+C: {}", e);
            futures_util::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("failed to listen for SIGTERM: {}", e);
                futures_util::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = futures_util::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
