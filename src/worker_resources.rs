// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes resource builders for workers and endpoints.
//!
//! This module turns [`WorkerRecord`]s and [`EndpointRecord`]s into `Pod` and
//! `Service` objects. All functions are pure and easily testable.

use crate::constants::{
    API_GROUP_VERSION, DISCOVERY_PORT_NAME, KIND_JEDY_KIND, WORKER_COMMAND,
    WORKER_CONTAINER_NAME,
};
use crate::crd::JedyKind;
use crate::errors::PoolError;
use crate::factory::EndpointRecord;
use crate::labels::{APP_LABEL, INTERNAL_SERVICE_LABEL};
use crate::observer::WorkerRecord;
use k8s_openapi::api::core::v1::{Container, Pod, PodSpec, Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::{
    apis::meta::v1::{ObjectMeta, OwnerReference},
    util::intstr::IntOrString,
};
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Builds owner references for an object owned by a `JedyKind`.
///
/// Sets up cascade deletion so that when the `JedyKind` is deleted, the
/// platform removes its worker pods and endpoint services. The removal is
/// asynchronous; nothing in a pass waits for it.
///
/// # Errors
///
/// Returns [`PoolError::MissingMetadata`] if the owner has no uid yet.
pub fn build_owner_references(owner: &JedyKind) -> Result<Vec<OwnerReference>, PoolError> {
    let uid = owner
        .metadata
        .uid
        .clone()
        .ok_or(PoolError::MissingMetadata { field: "uid" })?;

    Ok(vec![OwnerReference {
        api_version: API_GROUP_VERSION.to_string(),
        kind: KIND_JEDY_KIND.to_string(),
        name: owner.name_any(),
        uid,
        controller: Some(true),
        block_owner_deletion: Some(true),
    }])
}

/// Container image for the workers of `owner`.
#[must_use]
pub fn worker_image<'a>(owner: &'a JedyKind, default_image: &'a str) -> &'a str {
    owner
        .spec
        .image
        .as_deref()
        .filter(|image| !image.is_empty())
        .unwrap_or(default_image)
}

/// Labels shared by an endpoint and the worker group it selects.
#[must_use]
pub fn build_endpoint_labels(endpoint: &EndpointRecord) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_LABEL.to_string(), endpoint.app.clone()),
        (
            INTERNAL_SERVICE_LABEL.to_string(),
            endpoint.selector_suffix.clone(),
        ),
    ])
}

/// Builds the `Pod` for a worker.
///
/// The pod carries the pool labels (`app`, `internal_service`, `isMaster`)
/// and a single long-sleeping container.
#[must_use]
pub fn build_pod(worker: &WorkerRecord, owner_refs: Vec<OwnerReference>, image: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(worker.name.clone()),
            namespace: Some(worker.namespace.clone()),
            labels: Some(worker.labels.to_map()),
            owner_references: Some(owner_refs),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: WORKER_CONTAINER_NAME.to_string(),
                image: Some(image.to_string()),
                command: Some(WORKER_COMMAND.iter().map(ToString::to_string).collect()),
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the discovery `Service` for a worker group.
#[must_use]
pub fn build_service(endpoint: &EndpointRecord, owner_refs: Vec<OwnerReference>) -> Service {
    let labels = build_endpoint_labels(endpoint);

    Service {
        metadata: ObjectMeta {
            name: Some(endpoint.name.clone()),
            namespace: Some(endpoint.namespace.clone()),
            labels: Some(labels.clone()),
            owner_references: Some(owner_refs),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(labels),
            ports: Some(vec![ServicePort {
                name: Some(DISCOVERY_PORT_NAME.into()),
                port: endpoint.port,
                target_port: Some(IntOrString::Int(endpoint.target_port)),
                protocol: Some(endpoint.protocol.clone()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "worker_resources_tests.rs"]
mod worker_resources_tests;
