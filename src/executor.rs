// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Applies a [`ScaleAction`] to the resource store.
//!
//! Each step is one request. The first failure aborts the rest of the action
//! and is returned as-is; nothing is retried here; the controller's next pass
//! starts again from a fresh observation.
//!
//! A scale-up creates the worker before its endpoint. If the endpoint
//! creation fails the worker is left without one; later passes only compare
//! counts and will not notice.

use crate::constants::{KIND_POD, KIND_SERVICE};
use crate::crd::JedyKind;
use crate::engine::ScaleAction;
use crate::errors::PoolError;
use crate::factory::{build_endpoint, build_worker, EndpointRecord};
use crate::metrics;
use crate::observer::WorkerRecord;
use crate::store::PoolStore;
use crate::tokens::TokenSource;
use crate::worker_resources::{build_owner_references, build_pod, build_service, worker_image};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;
use tracing::{error, info, warn};

/// What an executed action changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Names of created workers
    pub created_workers: Vec<String>,
    /// Names of created endpoints
    pub created_endpoints: Vec<String>,
    /// Names of workers whose deletion was requested
    pub deleted_workers: Vec<String>,
}

/// Create a worker pod owned by `owner_refs`.
///
/// # Errors
///
/// Returns [`PoolError::Create`] if the store rejects the pod.
pub async fn create_worker(
    store: &dyn PoolStore,
    worker: &WorkerRecord,
    owner_refs: Vec<OwnerReference>,
    image: &str,
) -> Result<(), PoolError> {
    let pod = build_pod(worker, owner_refs, image);

    if let Err(e) = store.create_worker(&pod).await {
        error!("Failed to create worker {}/{}: {}", worker.namespace, worker.name, e);
        return Err(e);
    }

    metrics::record_resource_created(KIND_POD);
    Ok(())
}

/// Request deletion of a worker pod.
///
/// # Errors
///
/// Returns [`PoolError::Delete`] if the store rejects the request.
pub async fn delete_worker(store: &dyn PoolStore, worker: &WorkerRecord) -> Result<(), PoolError> {
    if let Err(e) = store.delete_worker(&worker.namespace, &worker.name).await {
        error!("Failed to delete worker {}/{}: {}", worker.namespace, worker.name, e);
        return Err(e);
    }

    metrics::record_resource_deleted(KIND_POD);
    Ok(())
}

/// Create an endpoint service owned by `owner_refs`.
///
/// # Errors
///
/// Returns [`PoolError::Create`] if the store rejects the service.
pub async fn create_endpoint(
    store: &dyn PoolStore,
    endpoint: &EndpointRecord,
    owner_refs: Vec<OwnerReference>,
) -> Result<(), PoolError> {
    let service = build_service(endpoint, owner_refs);

    if let Err(e) = store.create_endpoint(&service).await {
        error!(
            "Failed to create endpoint {}/{}: {}",
            endpoint.namespace, endpoint.name, e
        );
        return Err(e);
    }

    metrics::record_resource_created(KIND_SERVICE);
    Ok(())
}

/// Apply `action` for `owner`.
///
/// # Errors
///
/// Returns the first failing step's error. Steps after it are not attempted.
pub async fn execute(
    store: &dyn PoolStore,
    owner: &JedyKind,
    action: &ScaleAction,
    tokens: &dyn TokenSource,
    default_image: &str,
) -> Result<ExecutionReport, PoolError> {
    let mut report = ExecutionReport::default();

    match action {
        ScaleAction::NoOp => {}
        ScaleAction::ScaleDown { victims } => {
            for victim in victims {
                info!(
                    worker = %victim.name,
                    is_master = victim.is_master(),
                    "Scaling down: deleting worker"
                );
                delete_worker(store, victim).await?;
                report.deleted_workers.push(victim.name.clone());
            }
        }
        ScaleAction::ScaleUp { add_master } => {
            let owner_name = owner.name_any();
            let namespace = owner
                .namespace()
                .ok_or(PoolError::MissingMetadata { field: "namespace" })?;
            let owner_refs = build_owner_references(owner)?;

            let worker = build_worker(&owner_name, &namespace, *add_master, tokens);
            info!(
                worker = %worker.name,
                is_master = *add_master,
                "Scaling up: creating worker"
            );
            create_worker(
                store,
                &worker,
                owner_refs.clone(),
                worker_image(owner, default_image),
            )
            .await?;
            report.created_workers.push(worker.name.clone());

            let endpoint = build_endpoint(&owner_name, &namespace, worker.suffix());
            if let Err(e) = create_endpoint(store, &endpoint, owner_refs).await {
                warn!(
                    "Worker {}/{} was created without its endpoint {}",
                    namespace, worker.name, endpoint.name
                );
                return Err(e);
            }
            report.created_endpoints.push(endpoint.name);
        }
    }

    Ok(report)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
