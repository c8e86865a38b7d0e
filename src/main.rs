// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Router};
use clap::Parser;
use futures::StreamExt;
use jedy::{
    config::ControllerConfig,
    constants::{KIND_JEDY_KIND, METRICS_SERVER_PATH, TOKIO_WORKER_THREADS},
    context::Context,
    crd::JedyKind,
    errors::PoolError,
    metrics,
    reconcilers::{reconcile_jedykind, ReconcileOutcome},
};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ReconcileError(#[from] PoolError);

fn main() -> Result<()> {
    let config = ControllerConfig::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("jedy-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

/// Initialize logging.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT` (`json` or text).
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(config: ControllerConfig) -> Result<()> {
    init_tracing();

    info!("Starting Jedy worker pool controller");
    debug!(?config, "Loaded controller configuration");

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let metrics_bind_address = config.metrics_bind_address.clone();
    let ctx = Arc::new(Context::from_client(client.clone(), config));

    tokio::select! {
        result = run_jedykind_controller(client, ctx) => {
            error!("CRITICAL: JedyKind controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("JedyKind controller exited unexpectedly without error")
        }
        result = run_metrics_server(&metrics_bind_address) => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Metrics server exited unexpectedly without error")
        }
        result = shutdown_signal() => {
            result?;
            info!("Graceful shutdown completed successfully");
            Ok(())
        }
    }
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Received SIGINT, initiating graceful shutdown...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM (pod termination), initiating graceful shutdown...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received SIGINT, initiating graceful shutdown...");
    }

    Ok(())
}

/// Run the `JedyKind` controller
///
/// Changes to the owner or to any pod it owns trigger a pass for the owner.
async fn run_jedykind_controller(client: Client, ctx: Arc<Context>) -> Result<()> {
    info!("Starting JedyKind controller");

    let (owners, pods): (Api<JedyKind>, Api<Pod>) = match ctx.config.namespace.as_deref() {
        Some(namespace) => {
            info!("Watching namespace {}", namespace);
            (
                Api::namespaced(client.clone(), namespace),
                Api::namespaced(client, namespace),
            )
        }
        None => {
            debug!("Watching all namespaces");
            (Api::all(client.clone()), Api::all(client))
        }
    };

    Controller::new(owners, Config::default())
        .owns(pods, Config::default())
        .run(reconcile_jedykind_wrapper, error_policy, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Map a pass outcome to the controller's next action.
fn requeue_action(outcome: &ReconcileOutcome, ctx: &Context) -> Action {
    if outcome.requeue {
        Action::requeue(ctx.config.requeue_after())
    } else {
        Action::await_change()
    }
}

/// Reconcile wrapper for `JedyKind`
async fn reconcile_jedykind_wrapper(
    owner: Arc<JedyKind>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let name = owner.name_any();
    let namespace = owner.namespace().unwrap_or_default();

    debug!(
        owner_name = %name,
        namespace = %namespace,
        "Reconcile wrapper called for JedyKind"
    );

    match reconcile_jedykind(&ctx, &namespace, &name).await {
        Ok(outcome) => {
            metrics::record_reconciliation_success(KIND_JEDY_KIND, start.elapsed());
            if let (true, Some(action)) = (outcome.requeue, outcome.action.as_ref()) {
                metrics::record_reconciliation_requeue(KIND_JEDY_KIND, action.label());
            }
            Ok(requeue_action(&outcome, &ctx))
        }
        Err(e) => {
            error!("Failed to reconcile JedyKind {}/{}: {}", namespace, name, e);
            metrics::record_reconciliation_error(KIND_JEDY_KIND, start.elapsed());
            metrics::record_error(KIND_JEDY_KIND, e.metric_label());
            Err(e.into())
        }
    }
}

/// Error policy for `JedyKind` controller
fn error_policy(owner: Arc<JedyKind>, err: &ReconcileError, ctx: Arc<Context>) -> Action {
    warn!(
        "Requeueing JedyKind {}/{} after error: {}",
        owner.namespace().unwrap_or_default(),
        owner.name_any(),
        err
    );
    metrics::record_reconciliation_requeue(KIND_JEDY_KIND, "error");
    Action::requeue(ctx.config.error_requeue())
}

async fn metrics_handler() -> (StatusCode, String) {
    match metrics::gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Serve Prometheus metrics until the listener fails.
async fn run_metrics_server(bind_address: &str) -> Result<()> {
    let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Metrics server listening on {}{}", bind_address, METRICS_SERVER_PATH);

    axum::serve(listener, app).await?;
    Ok(())
}
