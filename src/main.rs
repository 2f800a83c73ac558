// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{routing::get, Router};
use casper3::{
    cluster::Cluster,
    config::Config,
    constants::{
        METRICS_SERVER_BIND_ADDRESS, METRICS_SERVER_PATH, METRICS_SERVER_PORT,
        TOKIO_WORKER_THREADS,
    },
    heritage, metrics,
    providers::{provider_from_config, DnsProvider},
    reconcilers::{sync_nodes, sync_pods},
};
use std::sync::Arc;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("casper3-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

/// Initialize logging with custom format
///
/// Respects `RUST_LOG` environment variable if set, otherwise derives the
/// filter from `LOGLEVEL` (`debug` enables verbose logs, anything else is
/// INFO). Respects `RUST_LOG_FORMAT` for output format (json or text).
fn initialize_logging(cfg: &Config) {
    let default_level = if cfg.log_level.eq_ignore_ascii_case("debug") {
        "debug"
    } else {
        "info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

/// Start the Prometheus metrics HTTP server
///
/// Serves metrics on the configured port and path (default: 0.0.0.0:8080/metrics)
///
/// # Returns
/// A `JoinHandle` that can be used to monitor the server task
fn start_metrics_server() -> tokio::task::JoinHandle<()> {
    info!(
        bind_address = METRICS_SERVER_BIND_ADDRESS,
        port = METRICS_SERVER_PORT,
        path = METRICS_SERVER_PATH,
        "Starting Prometheus metrics HTTP server"
    );

    tokio::spawn(async move {
        async fn metrics_handler() -> String {
            match metrics::gather_metrics() {
                Ok(metrics_text) => metrics_text,
                Err(e) => {
                    error!("Failed to gather metrics: {}", e);
                    String::from("# Error gathering metrics\n")
                }
            }
        }

        let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));

        let bind_addr = format!("{METRICS_SERVER_BIND_ADDRESS}:{METRICS_SERVER_PORT}");
        let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind metrics server to {bind_addr}: {e}");
                return;
            }
        };

        info!("Metrics server listening on http://{bind_addr}{METRICS_SERVER_PATH}");

        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {e}");
        }
    })
}

/// One reconciliation pass: fresh cluster handle, nodes, then pods when
/// enabled. Any failure here is confined to the tick.
async fn tick(provider: &Arc<dyn DnsProvider>, cfg: &Config) {
    let cluster = match Cluster::new().await {
        Ok(cluster) => cluster,
        Err(e) => {
            metrics::exec_err_inc(&e.to_string());
            error!(error = %e, "Failed to create cluster client, skipping tick");
            return;
        }
    };

    let nodes = match cluster.nodes(cfg).await {
        Ok(nodes) => nodes,
        Err(e) => {
            metrics::exec_err_inc(&e.to_string());
            error!(error = %e, "Failed to list nodes, skipping tick");
            return;
        }
    };

    if let Err(e) = sync_nodes(provider, &nodes, cfg).await {
        error!(error = %e, "Node reconciliation aborted");
    }

    if cfg.allow_sync_pods {
        // A pod listing failure is isolated to the pod reconciler.
        match cluster.pods(cfg).await {
            Ok(pods) => {
                if let Err(e) = sync_pods(provider, &pods, cfg).await {
                    error!(error = %e, "Pod reconciliation aborted");
                }
            }
            Err(e) => {
                metrics::exec_err_inc(&e.to_string());
                error!(error = %e, "Failed to list pods");
            }
        }
    }
}

async fn async_main() -> Result<()> {
    // An unparseable INTERVAL or unknown PROVIDER is fatal: the loop never starts.
    let cfg = Config::from_env()?;
    initialize_logging(&cfg);

    info!(
        label_key = %cfg.label_key,
        label_values = ?cfg.label_values,
        interval_secs = cfg.scan_interval.as_secs(),
        environment = %cfg.env,
        txt_identifier = %heritage::node_tag(&cfg.env),
        log_level = %cfg.log_level,
        "Launching casper3"
    );

    let provider = provider_from_config(&cfg);
    debug!(provider = provider.name(), zone = %cfg.zone, "Provider selected");

    start_metrics_server();

    loop {
        tick(&provider, &cfg).await;
        tokio::time::sleep(cfg.scan_interval).await;
    }
}
