// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Access to the external resource store.
//!
//! [`PoolStore`] is the seam between reconciliation and the Kubernetes API:
//! reading the owner, listing its workers and creating or deleting owned
//! objects. [`KubeStore`] implements it with kube-rs; tests substitute an
//! in-memory store.

use crate::crd::{JedyKind, JedyKindStatus};
use crate::errors::{is_not_found, PoolError};
use crate::labels::owner_selector;
use crate::pagination::list_all_paginated;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::{debug, info};

/// Operations a reconcile pass performs against the resource store.
///
/// Every call is a single request; implementations must not retry.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Read the owner. `Ok(None)` means it no longer exists.
    async fn get_owner(&self, namespace: &str, name: &str)
        -> Result<Option<JedyKind>, PoolError>;

    /// List every pod labelled `app=<owner_name>` in `namespace`.
    async fn list_workers(&self, namespace: &str, owner_name: &str)
        -> Result<Vec<Pod>, PoolError>;

    /// Create a worker pod.
    async fn create_worker(&self, pod: &Pod) -> Result<(), PoolError>;

    /// Request deletion of a worker pod. A pod that is already gone is not an error.
    async fn delete_worker(&self, namespace: &str, name: &str) -> Result<(), PoolError>;

    /// Create an endpoint service.
    async fn create_endpoint(&self, service: &Service) -> Result<(), PoolError>;

    /// Replace the owner's status subresource.
    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: &JedyKindStatus,
    ) -> Result<(), PoolError>;
}

/// [`PoolStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    field_manager: String,
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }
}

#[async_trait]
impl PoolStore for KubeStore {
    async fn get_owner(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<JedyKind>, PoolError> {
        let api: Api<JedyKind> = Api::namespaced(self.client.clone(), namespace);

        api.get_opt(name)
            .await
            .map_err(|source| PoolError::OwnerRead {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })
    }

    async fn list_workers(
        &self,
        namespace: &str,
        owner_name: &str,
    ) -> Result<Vec<Pod>, PoolError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().labels(&owner_selector(owner_name));

        list_all_paginated(&api, params)
            .await
            .map_err(|source| PoolError::List {
                owner: format!("{namespace}/{owner_name}"),
                source,
            })
    }

    async fn create_worker(&self, pod: &Pod) -> Result<(), PoolError> {
        let namespace = pod.namespace().unwrap_or_default();
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &namespace);

        api.create(&PostParams::default(), pod)
            .await
            .map_err(|source| PoolError::Create {
                kind: crate::constants::KIND_POD,
                name: pod.name_any(),
                source,
            })?;

        info!("Created Pod {}/{}", namespace, pod.name_any());
        Ok(())
    }

    async fn delete_worker(&self, namespace: &str, name: &str) -> Result<(), PoolError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

        match api.delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                info!("Requested deletion of Pod {}/{}", namespace, name);
                Ok(())
            }
            Err(e) if is_not_found(&e) => {
                debug!("Pod {}/{} already gone", namespace, name);
                Ok(())
            }
            Err(source) => Err(PoolError::Delete {
                kind: crate::constants::KIND_POD,
                name: name.to_string(),
                source,
            }),
        }
    }

    async fn create_endpoint(&self, service: &Service) -> Result<(), PoolError> {
        let namespace = service.namespace().unwrap_or_default();
        let api: Api<Service> = Api::namespaced(self.client.clone(), &namespace);

        api.create(&PostParams::default(), service)
            .await
            .map_err(|source| PoolError::Create {
                kind: crate::constants::KIND_SERVICE,
                name: service.name_any(),
                source,
            })?;

        info!("Created Service {}/{}", namespace, service.name_any());
        Ok(())
    }

    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: &JedyKindStatus,
    ) -> Result<(), PoolError> {
        let api: Api<JedyKind> = Api::namespaced(self.client.clone(), namespace);
        let patch = json!({ "status": status });

        api.patch_status(
            name,
            &PatchParams::apply(&self.field_manager),
            &Patch::Merge(&patch),
        )
        .await
        .map_err(|source| PoolError::StatusUpdate {
            owner: format!("{namespace}/{name}"),
            source,
        })?;

        Ok(())
    }
}
