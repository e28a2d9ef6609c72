//! CADOP search service.
//!
//! Looks up registered health plan operators by legal or trade name,
//! ignoring case and diacritics. The dataset is loaded once at startup and
//! served read-only over HTTP.
//!
//! # Environment Variables
//! - `DATA_FILE_PATH` - Path to the CSV export (default: data/Relatorio_cadop.csv)
//! - `HTTP_PORT` - Search API port (default: 5000)
//! - `METRICS_PORT` - Prometheus metrics port (default: 9090)
//! - `BIND_ADDRESS` - Bind address (default: auto)
//! - `SAMPLE_DATASET` - Serve built-in sample data (default: false)
//! - `RUST_LOG` - Log level (default: info)

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cadop_search::config::Config;
use cadop_search::dataset::{load_csv, sample_dataset, Dataset};
use cadop_search::http;
use cadop_search::metrics;
use cadop_search::search::{DatasetSearcher, Searcher};

/// Load the dataset the service will answer from. Any failure is fatal.
async fn load_dataset(config: &Config) -> anyhow::Result<Dataset> {
    if config.sample_dataset {
        info!("SAMPLE_DATASET=true: Serving built-in sample dataset");
        return Ok(sample_dataset()?);
    }

    let path = config.data_file_path.clone();
    let dataset = tokio::task::spawn_blocking(move || load_csv(&path))
        .await
        .context("Dataset loading task failed")?;

    dataset.map_err(|e| {
        error!(
            error = %e,
            data_file = %config.data_file_path,
            "FATAL: Failed to load dataset. Set SAMPLE_DATASET=true to run without a data file."
        );
        anyhow::Error::new(e).context("Failed to load dataset")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (use RUST_LOG env var to control log level)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting CADOP search service");

    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        http_port = config.http_port,
        metrics_port = config.metrics_port,
        bind_address = %config.bind_address,
        sample_dataset = config.sample_dataset,
        "Configuration loaded"
    );

    let metrics_handle = metrics::init_metrics().context("Failed to install Prometheus recorder")?;

    // The dataset must be complete before any request is accepted.
    let dataset = Arc::new(load_dataset(&config).await?);
    info!(
        records = dataset.len(),
        source = %dataset.source(),
        "Dataset loaded successfully"
    );

    let searcher: Arc<dyn Searcher> = Arc::new(DatasetSearcher::new(dataset));

    let metrics_addr = config.bind_addr(config.metrics_port)?;
    tokio::spawn(async move {
        if let Err(e) = metrics::start_metrics_server(metrics_addr, metrics_handle).await {
            error!(error = %e, "Metrics server failed");
        }
    });

    let http_addr = config.bind_addr(config.http_port)?;
    let listener = http::bind_with_fallback(http_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", http_addr))?;

    info!(addr = %listener.local_addr()?, "Starting HTTP server");

    axum::serve(listener, http::router(searcher))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
